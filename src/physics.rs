//! 運動方程式と力学的エネルギー。
//!
//! 質点 i に働く力は
//!
//! ```text
//! F_i = -k_i x_i - c_i v_i - Σ kc (x_i - x_j) + f_i + m_i g_i
//! ```
//!
//! で、和は i を端点に持つすべての結合ばねについて取ります。`f_i` と `g_i` は一定の外力と
//! 重力加速度で、既定は0です。加速度は `F_i / m_i` です。

use crate::integrator::SecondOrderSystem;
use crate::model::MechanicalSystemConfig;

/// 現在の位置と速度から各質点の加速度を計算します。
///
/// 副作用のない純粋関数です。`positions`と`velocities`の長さは質点数と同じである必要があります。
pub fn accelerations(config: &MechanicalSystemConfig, positions: &[f64], velocities: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; config.num_bodies()];
    accelerations_into(config, positions, velocities, &mut out);
    out
}

/// `accelerations`の書き込み先を指定する版。`out`は上書きされます。
pub fn accelerations_into(
    config: &MechanicalSystemConfig,
    positions: &[f64],
    velocities: &[f64],
    out: &mut [f64],
) {
    // 自身の原点へのばねとダンパ、一定の外力と重力
    for (i, f) in out.iter_mut().enumerate() {
        *f = -config.spring_constants()[i] * positions[i] - config.dampings()[i] * velocities[i]
            + config.constant_force(i);
    }

    // 結合ばねは1本につき1回だけ評価し、両端へ逆向きに加える
    for coupling in config.couplings() {
        let [i, j] = coupling.bodies();
        let f = coupling.stiffness() * coupling.extension(positions);
        out[i] -= f;
        out[j] += f;
    }

    for (f, m) in out.iter_mut().zip(config.masses()) {
        *f /= m;
    }
}

/// 運動エネルギー `Σ ½ m v²`。
pub fn kinetic_energy(config: &MechanicalSystemConfig, velocities: &[f64]) -> f64 {
    config
        .masses()
        .iter()
        .zip(velocities)
        .map(|(m, v)| 0.5 * m * v * v)
        .sum()
}

/// 原点ばねと結合ばねのポテンシャルエネルギーに、一定の力のポテンシャル `-Σ (f_i + m_i g_i) x_i` を加えたもの。
pub fn potential_energy(config: &MechanicalSystemConfig, positions: &[f64]) -> f64 {
    let anchors: f64 = config
        .spring_constants()
        .iter()
        .zip(positions)
        .map(|(k, x)| 0.5 * k * x * x)
        .sum();
    let couplings: f64 = config
        .couplings()
        .iter()
        .map(|c| c.potential_energy(positions))
        .sum();
    let forcing: f64 = positions
        .iter()
        .enumerate()
        .map(|(i, x)| config.constant_force(i) * x)
        .sum();
    anchors + couplings - forcing
}

/// 力学的エネルギー (運動 + ポテンシャル)。
pub fn mechanical_energy(config: &MechanicalSystemConfig, positions: &[f64], velocities: &[f64]) -> f64 {
    kinetic_energy(config, velocities) + potential_energy(config, positions)
}

/// 運動量 `Σ m v`。
pub fn momentum(config: &MechanicalSystemConfig, velocities: &[f64]) -> f64 {
    config.masses().iter().zip(velocities).map(|(m, v)| m * v).sum()
}

impl SecondOrderSystem for MechanicalSystemConfig {
    fn dimension(&self) -> usize {
        self.num_bodies()
    }

    fn accelerations(&self, positions: &[f64], velocities: &[f64], out: &mut [f64]) {
        accelerations_into(self, positions, velocities, out);
    }
}
