//! シナリオ (YAML) の読み込みと、組み込みの例・ランダムな連鎖の生成。
//!
//! ```yaml
//! masses: [1.0, 1.0, 1.0]
//! dampings: [0.1, 0.1, 0.1]
//! spring_constants: [2.0, 2.0, 2.0]
//! initial_positions: [1.0, 0.0, -1.0]
//! initial_velocities: [0.0, 0.0, 0.0]
//! couplings: [[0, 1], [1, 2]]
//! coupling_constants: [1.0, 1.0]
//! external_forces: [0.0, 0.0, 0.5]   # 省略時は0
//! gravity: [-9.8, -9.8, -9.8]        # 省略時は0
//! simulation:
//!   t_end: 10.0
//!   step: 0.01
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::Result;
use crate::system::MultiMechanicalSystem;

/// 既定のシミュレーション時間
pub const DEFAULT_T_END: f64 = 10.0;
/// 既定の時間刻み
pub const DEFAULT_STEP: f64 = 0.01;

/// シミュレーションの時間設定。
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub t_end: f64,
    pub step: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            t_end: DEFAULT_T_END,
            step: DEFAULT_STEP,
        }
    }
}

/// シナリオファイルの内容。
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub masses: Vec<f64>,
    pub dampings: Vec<f64>,
    pub spring_constants: Vec<f64>,
    pub initial_positions: Vec<f64>,
    pub initial_velocities: Vec<f64>,
    #[serde(default)]
    pub couplings: Vec<[usize; 2]>,
    #[serde(default)]
    pub coupling_constants: Vec<f64>,
    /// 空なら外力なし
    #[serde(default)]
    pub external_forces: Vec<f64>,
    /// 空なら重力なし
    #[serde(default)]
    pub gravity: Vec<f64>,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl ScenarioConfig {
    /// YAML ファイルからシナリオを読み込みます。
    ///
    /// # Errors
    ///
    /// ファイルが開けない、または YAML として解釈できない場合。
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path.as_ref())?;
        let scenario = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(scenario)
    }

    /// YAML 文字列からシナリオを読み込みます。
    ///
    /// # Errors
    ///
    /// YAML として解釈できない場合。
    pub fn from_yaml_str(text: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// 3つの質点を2本のばねで直列につないだ例。
    pub fn chained_springs() -> Self {
        Self {
            masses: vec![1.0, 1.0, 1.0],
            dampings: vec![0.1, 0.1, 0.1],
            spring_constants: vec![2.0, 2.0, 2.0],
            initial_positions: vec![1.0, 0.0, -1.0],
            initial_velocities: vec![0.0, 0.0, 0.0],
            couplings: vec![[0, 1], [1, 2]],
            coupling_constants: vec![1.0, 1.0],
            external_forces: Vec::new(),
            gravity: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }

    /// `bodies`個の質点をランダムなパラメータで直列につないだ連鎖。
    ///
    /// 質量は `[0.5, 2.0)`、減衰は `[0.0, 0.5)`、ばね定数は `[0.5, 4.0)`、
    /// 結合定数は `[0.1, 2.0)`、初期位置は `[-1.0, 1.0)`、初期速度は0です。
    pub fn random_chain<R: Rng>(bodies: usize, rng: &mut R) -> Self {
        let mut sample = |lo: f64, hi: f64| (0..bodies).map(|_| rng.random_range(lo..hi)).collect::<Vec<_>>();
        let masses = sample(0.5, 2.0);
        let dampings = sample(0.0, 0.5);
        let spring_constants = sample(0.5, 4.0);
        let initial_positions = sample(-1.0, 1.0);
        let mut coupling_constants = sample(0.1, 2.0);
        coupling_constants.truncate(bodies.saturating_sub(1));

        Self {
            masses,
            dampings,
            spring_constants,
            initial_positions,
            initial_velocities: vec![0.0; bodies],
            couplings: (1..bodies).map(|i| [i - 1, i]).collect(),
            coupling_constants,
            external_forces: Vec::new(),
            gravity: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }

    /// シナリオから系を構築します。
    ///
    /// # Errors
    ///
    /// 構成が不正な場合。
    pub fn build(&self) -> Result<MultiMechanicalSystem> {
        let couplings = self.couplings.iter().map(|&[i, j]| (i, j)).collect::<Vec<_>>();
        let mut system = MultiMechanicalSystem::new(
            &self.masses,
            &self.dampings,
            &self.spring_constants,
            &self.initial_positions,
            &self.initial_velocities,
            &couplings,
            &self.coupling_constants,
        )?;
        if !self.external_forces.is_empty() {
            system.set_external_forces(&self.external_forces)?;
        }
        if !self.gravity.is_empty() {
            system.set_gravity(&self.gravity)?;
        }
        Ok(system)
    }
}
