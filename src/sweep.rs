//! パラメータスイープ。
//!
//! 独立な系を1つずつタスクに割り当て、rayon で並列にシミュレーションします。

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::cli::SweepArgs;
use crate::error::Result;
use crate::scenario::ScenarioConfig;

/// 1回分のスイープ結果。
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRun {
    pub seed: u64,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub max_displacement: f64,
}

impl SweepRun {
    /// 初期エネルギーに対する最終エネルギーの比。
    pub fn energy_ratio(&self) -> f64 {
        if self.initial_energy > 0.0 {
            self.final_energy / self.initial_energy
        } else {
            0.0
        }
    }
}

/// `count`個のランダムな連鎖を並列にシミュレーションします。
///
/// `i`番目の系はシード `seed + i` の乱数から生成するため、結果は並列度によらず再現できます。
///
/// # Errors
///
/// いずれかの系の構築またはシミュレーションに失敗した場合。
pub fn sweep(count: usize, bodies: usize, seed: u64, t_end: f64, step: f64) -> Result<Vec<SweepRun>> {
    (0..count as u64)
        .into_par_iter()
        .map(|i| -> Result<SweepRun> {
            let seed = seed.wrapping_add(i);
            let scenario = ScenarioConfig::random_chain(bodies, &mut StdRng::seed_from_u64(seed));
            let mut system = scenario.build()?;
            let initial_energy = system.energy();
            system.simulate(t_end, step)?;
            ftlog::debug!("シード {seed} の系が完了しました");
            Ok(SweepRun {
                seed,
                initial_energy,
                final_energy: system.energy(),
                max_displacement: system.trajectory().max_displacement(),
            })
        })
        .collect()
}

/// `sweep`サブコマンドを実行します。
pub fn run(args: &SweepArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!(
        "スイープを開始します: {} 系 × {} 質点 (シード {}, T = {}, h = {})",
        args.count, args.bodies, args.seed, args.t_end, args.step
    );
    let sweep_start = Instant::now();
    let runs = sweep(args.count, args.bodies, args.seed, args.t_end, args.step)?;
    let sweep_duration = sweep_start.elapsed();

    for run in &runs {
        println!(
            "[Seed {}] Energy: {:.6} -> {:.6} (ratio {:.4}), Max |x|: {:.4}",
            run.seed,
            run.initial_energy,
            run.final_energy,
            run.energy_ratio(),
            run.max_displacement
        );
    }
    println!("スイープが完了しました。");
    println!("=> 計算時間: {:.2?}", sweep_duration);

    Ok(())
}
