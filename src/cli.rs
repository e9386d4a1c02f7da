use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ftlog::LevelFilter;

use crate::{CSV_FILENAME, PLOT_FILENAME};

/// clapでコマンドラインの構造を定義します。
#[derive(Parser, Debug)]
#[command(author, version, about = "A chained mass-spring-damper simulator with RK4", long_about = None)]
pub struct Cli {
    /// ログの出力レベル
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// ログの出力先ファイル (省略時は標準エラー出力)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 実行するサブコマンドを定義します（simulate または sweep）。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 多質点ばね系をシミュレーションし、結果をグラフとCSVに保存します
    Simulate(SimulateArgs),
    /// ランダムな連鎖を並列にシミュレーションし、エネルギーの減衰を報告します
    Sweep(SweepArgs),
}

/// `simulate`サブコマンドの引数。
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// シナリオファイル (YAML)。省略時は3質点の連鎖
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// シミュレーション時間 (シナリオの値を上書き)
    #[arg(short = 'T', long)]
    pub t_end: Option<f64>,

    /// 時間刻み (シナリオの値を上書き)
    #[arg(short = 'H', long)]
    pub step: Option<f64>,

    /// グラフの出力先
    #[arg(long, default_value = PLOT_FILENAME)]
    pub plot: PathBuf,

    /// CSVの出力先
    #[arg(long, default_value = CSV_FILENAME)]
    pub csv: PathBuf,

    /// グラフを描画しない
    #[arg(long)]
    pub no_plot: bool,
}

/// `sweep`サブコマンドの引数。
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// 生成する系の数
    #[arg(short, long, default_value_t = 16)]
    pub count: usize,

    /// 1つの連鎖あたりの質点数
    #[arg(short, long, default_value_t = 3)]
    pub bodies: usize,

    /// 乱数のシード
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// シミュレーション時間
    #[arg(short = 'T', long, default_value_t = crate::scenario::DEFAULT_T_END)]
    pub t_end: f64,

    /// 時間刻み
    #[arg(short = 'H', long, default_value_t = crate::scenario::DEFAULT_STEP)]
    pub step: f64,
}

/// ログの出力レベル。
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}
