//! 多質点ばね系 `MultiMechanicalSystem`。
//!
//! 構成・現在の力学的状態・直近のシミュレーション結果を所有し、
//! RK4 で状態を時間発展させます。

use crate::error::{ConfigurationError, Result};
use crate::integrator::{State, rk4_step};
use crate::model::MechanicalSystemConfig;
use crate::physics;
use crate::trajectory::Trajectory;

/// 系がシミュレーション済みかどうか。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationStatus {
    /// 構築直後。時系列は空。
    Unsimulated,
    /// 少なくとも1回`simulate`が成功した。
    Simulated,
}

/// 結合ばねでつながった多質点の減衰振動系。
#[derive(Debug, Clone)]
pub struct MultiMechanicalSystem {
    config: MechanicalSystemConfig,
    state: State,
    trajectory: Trajectory,
    status: SimulationStatus,
}

impl MultiMechanicalSystem {
    /// 系を構築します。
    ///
    /// `couplings[k]`は質点の組`(i, j)`で、そのばね定数は`coupling_constants[k]`です。
    /// 初期位置と初期速度は複製され、時刻は0から始まります。
    ///
    /// # Errors
    ///
    /// 構成の不変条件に違反した場合、または初期状態の長さが質点数と異なる場合。
    pub fn new(
        masses: &[f64],
        dampings: &[f64],
        spring_constants: &[f64],
        initial_positions: &[f64],
        initial_velocities: &[f64],
        couplings: &[(usize, usize)],
        coupling_constants: &[f64],
    ) -> Result<Self> {
        let config = MechanicalSystemConfig::new(
            masses,
            dampings,
            spring_constants,
            couplings,
            coupling_constants,
        )?;
        Self::from_config(config, initial_positions, initial_velocities)
    }

    /// 検証済みの構成から系を構築します。
    ///
    /// # Errors
    ///
    /// 初期状態の長さが質点数と異なる、または有限でない値を含む場合。
    pub fn from_config(
        config: MechanicalSystemConfig,
        initial_positions: &[f64],
        initial_velocities: &[f64],
    ) -> Result<Self> {
        config
            .check_state("initial_positions", initial_positions)
            .and_then(|()| config.check_state("initial_velocities", initial_velocities))
            .inspect_err(|e| ftlog::error!("{e}"))?;

        ftlog::debug!(
            "質点数 {} / 結合数 {} の系を構築しました",
            config.num_bodies(),
            config.couplings().len()
        );

        Ok(Self {
            state: State::new(initial_positions.to_vec(), initial_velocities.to_vec()),
            config,
            trajectory: Trajectory::default(),
            status: SimulationStatus::Unsimulated,
        })
    }

    /// 時間`t_end`だけ刻み`h`でシミュレーションします。
    ///
    /// 現在の状態から`floor(t_end / h)`ステップ進め、開始時の状態を含む
    /// `floor(t_end / h) + 1`個のサンプルで時系列を置き換えます。
    /// 繰り返し呼ぶと、前回の終状態から続けて積分します。
    ///
    /// 失敗した場合、状態と時系列は呼び出し前のまま残ります。
    ///
    /// # Errors
    ///
    /// - `t_end`または`h`が正の有限値でない場合
    /// - ステップ数が`usize`に収まらない、または時系列の領域を確保できない場合
    /// - 積分中に状態が有限でなくなった場合
    pub fn simulate(&mut self, t_end: f64, h: f64) -> Result<()> {
        if !(t_end.is_finite() && t_end > 0.0) {
            return Err(ConfigurationError::InvalidDuration(t_end));
        }
        check_step(h)?;

        let steps = step_count(t_end, h).inspect_err(|e| ftlog::error!("{e}"))?;
        ftlog::info!(
            "シミュレーション開始: t = {} から {} ステップ (h = {h})",
            self.state.time,
            steps
        );

        let t0 = self.state.time;
        let mut state = self.state.clone();
        // step_count が usize::MAX 未満を保証するので steps + 1 は溢れない
        let mut trajectory = Trajectory::try_with_capacity(steps + 1).map_err(|_| {
            let err = ConfigurationError::TooManySteps { t_end, step: h };
            ftlog::error!("{err}");
            err
        })?;
        trajectory.record(t0, &state.positions, &state.velocities);

        for k in 1..=steps {
            rk4_step(&self.config, &mut state, h);
            // 積算誤差を避けるため時刻は乗算で求める
            state.time = t0 + k as f64 * h;
            if !state.is_finite() {
                let err = ConfigurationError::Diverged { time: state.time };
                ftlog::error!("{err}");
                return Err(err);
            }
            trajectory.record(state.time, &state.positions, &state.velocities);
        }

        self.state = state;
        self.trajectory = trajectory;
        self.status = SimulationStatus::Simulated;
        ftlog::info!(
            "シミュレーション完了: t = {}, エネルギー = {:.6}",
            self.state.time,
            self.energy()
        );
        Ok(())
    }

    /// 時系列に記録せず、状態を1ステップだけ進めます。
    ///
    /// # Errors
    ///
    /// `h`が正の有限値でない場合、または状態が有限でなくなった場合。
    pub fn step(&mut self, h: f64) -> Result<()> {
        check_step(h)?;
        let mut state = self.state.clone();
        rk4_step(&self.config, &mut state, h);
        if !state.is_finite() {
            let err = ConfigurationError::Diverged { time: state.time };
            ftlog::error!("{err}");
            return Err(err);
        }
        self.state = state;
        Ok(())
    }

    /// 各質点に働く一定の外力を設定します。次の積分から有効になります。
    ///
    /// # Errors
    ///
    /// 長さが質点数と異なる、または有限でない値を含む場合。
    pub fn set_external_forces(&mut self, forces: &[f64]) -> Result<()> {
        self.config.set_external_forces(forces)
    }

    /// 各質点の重力加速度を設定します。次の積分から有効になります。
    ///
    /// # Errors
    ///
    /// 長さが質点数と異なる、または有限でない値を含む場合。
    pub fn set_gravity(&mut self, gravity: &[f64]) -> Result<()> {
        self.config.set_gravity(gravity)
    }

    /// 現在の状態における各質点の加速度。
    pub fn accelerations(&self) -> Vec<f64> {
        physics::accelerations(&self.config, &self.state.positions, &self.state.velocities)
    }

    /// 現在の力学的エネルギー。
    pub fn energy(&self) -> f64 {
        physics::mechanical_energy(&self.config, &self.state.positions, &self.state.velocities)
    }

    pub fn config(&self) -> &MechanicalSystemConfig {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn positions(&self) -> &[f64] {
        &self.state.positions
    }

    pub fn velocities(&self) -> &[f64] {
        &self.state.velocities
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    /// 直近の`simulate`の結果。未実行なら空。
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }
}

fn check_step(h: f64) -> Result<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidStep(h))
    }
}

/// `floor(t_end / h)`。
///
/// 比が整数に十分近ければその整数に丸め、`10.0 / 0.01`のような
/// 2進表現の誤差で1ステップ欠けないようにする。
///
/// # Errors
///
/// 比が有限でない、または`usize`で表せない場合は`TooManySteps`。
pub fn step_count(t_end: f64, h: f64) -> Result<usize> {
    let ratio = t_end / h;
    let nearest = ratio.round();
    let steps = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
        nearest
    } else {
        ratio.floor()
    };
    // usize::MAX as f64 は 2^64 に丸められる
    if steps.is_finite() && steps < usize::MAX as f64 {
        Ok(steps as usize)
    } else {
        Err(ConfigurationError::TooManySteps { t_end, step: h })
    }
}
