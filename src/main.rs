//! # 多質点ばね系シミュレータ
//!
//! 3つの質点をばねで直列につないだ減衰振動系などを RK4 でシミュレーションし、
//! 各質点の変位をグラフとCSVに保存します。
//!
//! ## 使い方
//!
//! ### シミュレーション
//! ```bash
//! cargo run --release -- simulate
//! cargo run --release -- simulate --scenario scenarios/chained_springs.yaml -T 20
//! ```
//!
//! ### パラメータスイープ
//! ```bash
//! cargo run --release -- sweep --count 32 --bodies 5 --seed 7
//! ```

use clap::Parser;
use mechsim::cli::{Cli, Commands};
use mechsim::logging::configure_logger;
use mechsim::{simulation, sweep};

/// プログラムのエントリーポイント。
///
/// コマンドライン引数を解析し、`simulate`または`sweep`の処理に振り分けます。
fn main() {
    let cli = Cli::parse();

    let guard = match configure_logger(cli.log_level.into(), cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ロガーの初期化に失敗しました: {}", e);
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Simulate(args) => simulation::run(args),
        Commands::Sweep(args) => sweep::run(args),
    };

    if let Err(e) = result {
        ftlog::error!("{e}");
        eprintln!("エラー: {}", e);
        drop(guard);
        std::process::exit(1);
    }
}
