use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use crate::cli::SimulateArgs;
use crate::modal::{natural_frequencies, static_equilibrium};
use crate::plot::plot_trajectory;
use crate::scenario::ScenarioConfig;

/// `simulate`サブコマンドを実行します。
pub fn run(args: &SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    // --- シナリオの準備 ---
    let scenario = match &args.scenario {
        Some(path) => {
            println!("シナリオを '{}' から読み込み中...", path.display());
            ScenarioConfig::from_yaml_file(path)?
        }
        None => {
            println!("組み込みの3質点連鎖を使用します。");
            ScenarioConfig::chained_springs()
        }
    };
    let t_end = args.t_end.unwrap_or(scenario.simulation.t_end);
    let step = args.step.unwrap_or(scenario.simulation.step);

    let mut system = scenario.build()?;
    let omegas = natural_frequencies(system.config());
    println!(
        "質点数: {}, 結合数: {}, 固有角振動数: {:.4?}",
        system.config().num_bodies(),
        system.config().couplings().len(),
        omegas
    );
    if let Some(x_eq) = static_equilibrium(system.config()) {
        println!("静的つり合い位置: {:.4?}", x_eq);
    }

    // --- シミュレーション ---
    println!("シミュレーションを開始します (T = {t_end}, h = {step})");
    let initial_energy = system.energy();
    let simulation_start = Instant::now();
    system.simulate(t_end, step)?;
    let simulation_duration = simulation_start.elapsed();

    let trajectory = system.trajectory();
    println!("シミュレーションが完了しました。サンプル数: {}", trajectory.len());
    println!(
        "=> 力学的エネルギー: {:.6} -> {:.6}",
        initial_energy,
        system.energy()
    );
    println!("=> 計算時間: {:.2?}", simulation_duration);

    // --- 結果の保存と描画 ---
    trajectory.write_csv(BufWriter::new(File::create(&args.csv)?))?;
    println!("=> 時系列を '{}' に保存しました。", args.csv.display());

    if !args.no_plot {
        plot_trajectory(trajectory, &args.plot)?;
        println!("=> 変位グラフを '{}' に保存しました。", args.plot.display());
    }

    Ok(())
}
