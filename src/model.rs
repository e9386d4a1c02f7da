//! 多質点系の物理パラメータ。
//!
//! 各質点は自身の原点へのばねとダンパを持ち、さらに質点間の結合ばねで
//! 互いにつながります。構築時にすべての不変条件を検査します。
//! 後から変更できるのは一定の外力と重力だけです (既定は0)。

use crate::error::{ConfigurationError, Result};

/// 2つの質点をつなぐ結合ばね。
///
/// 1本のばねを両端の質点から参照します。質点ごとに2本へ複製はしません。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    bodies: [usize; 2],
    stiffness: f64,
}

impl Coupling {
    /// 質点`i`と`j`をばね定数`stiffness`で結合します。
    pub const fn new(i: usize, j: usize, stiffness: f64) -> Self {
        Self {
            bodies: [i, j],
            stiffness,
        }
    }

    /// 結合している2つの質点のインデックス。
    pub const fn bodies(&self) -> [usize; 2] {
        self.bodies
    }

    /// 結合ばねのばね定数。
    pub const fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// `body`がこの結合の端点なら、もう一方の質点を返します。
    pub fn partner(&self, body: usize) -> Option<usize> {
        match self.bodies {
            [a, b] if a == body => Some(b),
            [a, b] if b == body => Some(a),
            _ => None,
        }
    }

    /// 相対変位の符号付き伸び `x_i - x_j`。
    pub fn extension(&self, positions: &[f64]) -> f64 {
        let [i, j] = self.bodies;
        positions[i] - positions[j]
    }

    /// このばねに蓄えられたポテンシャルエネルギー。
    pub fn potential_energy(&self, positions: &[f64]) -> f64 {
        let d = self.extension(positions);
        0.5 * self.stiffness * d * d
    }
}

/// 多質点系の構成 (質量・減衰・ばね定数・結合・一定の外力と重力)。
#[derive(Debug, Clone, PartialEq)]
pub struct MechanicalSystemConfig {
    masses: Vec<f64>,
    dampings: Vec<f64>,
    spring_constants: Vec<f64>,
    couplings: Vec<Coupling>,
    external_forces: Vec<f64>,
    gravity: Vec<f64>,
}

impl MechanicalSystemConfig {
    /// 構成を検証して作成します。
    ///
    /// `couplings[k]`のばね定数は`coupling_constants[k]`です。
    /// 同じ組の結合が複数あれば、そのまま加算的に働きます。
    ///
    /// # Errors
    ///
    /// - 質点が1つもない場合
    /// - 系列の長さが一致しない場合
    /// - 結合のインデックスが範囲外、または両端が同じ場合
    /// - 質量が正でない、係数が負、または値が有限でない場合
    pub fn new(
        masses: &[f64],
        dampings: &[f64],
        spring_constants: &[f64],
        couplings: &[(usize, usize)],
        coupling_constants: &[f64],
    ) -> Result<Self> {
        if couplings.len() != coupling_constants.len() {
            let err = ConfigurationError::length_mismatch(
                "coupling_constants",
                couplings.len(),
                coupling_constants.len(),
            );
            ftlog::error!("{err}");
            return Err(err);
        }
        let couplings = couplings
            .iter()
            .zip(coupling_constants)
            .map(|(&(i, j), &k)| Coupling::new(i, j, k))
            .collect();
        Self::from_parts(
            masses.to_vec(),
            dampings.to_vec(),
            spring_constants.to_vec(),
            couplings,
        )
    }

    /// 既に組み立てた`Coupling`から構成を作成します。検証は`new`と同じです。
    ///
    /// # Errors
    ///
    /// `new`と同じ条件で失敗します。
    pub fn from_parts(
        masses: Vec<f64>,
        dampings: Vec<f64>,
        spring_constants: Vec<f64>,
        couplings: Vec<Coupling>,
    ) -> Result<Self> {
        let n = masses.len();
        let config = Self {
            masses,
            dampings,
            spring_constants,
            couplings,
            external_forces: vec![0.0; n],
            gravity: vec![0.0; n],
        };
        config.validate().inspect_err(|e| ftlog::error!("{e}"))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let n = self.masses.len();
        if n == 0 {
            return Err(ConfigurationError::EmptySystem);
        }
        check_len("dampings", n, &self.dampings)?;
        check_len("spring_constants", n, &self.spring_constants)?;

        check_finite("masses", &self.masses)?;
        if let Some((body, &value)) = self.masses.iter().enumerate().find(|(_, m)| **m <= 0.0) {
            return Err(ConfigurationError::NonPositiveMass { body, value });
        }
        check_non_negative("dampings", &self.dampings)?;
        check_non_negative("spring_constants", &self.spring_constants)?;

        for (coupling, c) in self.couplings.iter().enumerate() {
            let [i, j] = c.bodies;
            if let Some(&index) = c.bodies.iter().find(|&&b| b >= n) {
                return Err(ConfigurationError::CouplingIndexOutOfRange {
                    coupling,
                    index,
                    bodies: n,
                });
            }
            if i == j {
                return Err(ConfigurationError::SelfCoupling { coupling, body: i });
            }
        }
        let stiffnesses = self.couplings.iter().map(Coupling::stiffness).collect::<Vec<_>>();
        check_non_negative("coupling_constants", &stiffnesses)
    }

    /// 質点ごとの系列 (位置・速度・外力など) が質点数と一致し、有限であることを検査します。
    ///
    /// # Errors
    ///
    /// 長さが質点数と異なる、または有限でない値を含む場合。
    pub fn check_state(&self, field: &'static str, values: &[f64]) -> Result<()> {
        check_len(field, self.num_bodies(), values)?;
        check_finite(field, values)
    }

    /// 各質点に働く一定の外力 `F_i` を設定します。
    ///
    /// # Errors
    ///
    /// 長さが質点数と異なる、または有限でない値を含む場合。構成は変更されません。
    pub fn set_external_forces(&mut self, forces: &[f64]) -> Result<()> {
        self.check_state("external_forces", forces)
            .inspect_err(|e| ftlog::error!("{e}"))?;
        self.external_forces = forces.to_vec();
        Ok(())
    }

    /// 各質点の重力加速度 `g_i` を設定します。質点`i`には`m_i g_i`の力が働きます。
    ///
    /// # Errors
    ///
    /// 長さが質点数と異なる、または有限でない値を含む場合。構成は変更されません。
    pub fn set_gravity(&mut self, gravity: &[f64]) -> Result<()> {
        self.check_state("gravity", gravity)
            .inspect_err(|e| ftlog::error!("{e}"))?;
        self.gravity = gravity.to_vec();
        Ok(())
    }

    /// 質点`body`に働く一定の力 `F_i + m_i g_i`。
    pub fn constant_force(&self, body: usize) -> f64 {
        self.external_forces[body] + self.masses[body] * self.gravity[body]
    }

    /// 質点数 N。
    pub fn num_bodies(&self) -> usize {
        self.masses.len()
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn dampings(&self) -> &[f64] {
        &self.dampings
    }

    pub fn spring_constants(&self) -> &[f64] {
        &self.spring_constants
    }

    pub fn couplings(&self) -> &[Coupling] {
        &self.couplings
    }

    pub fn external_forces(&self) -> &[f64] {
        &self.external_forces
    }

    pub fn gravity(&self) -> &[f64] {
        &self.gravity
    }
}

fn check_len(field: &'static str, expected: usize, values: &[f64]) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ConfigurationError::length_mismatch(field, expected, values.len()))
    }
}

fn check_finite(field: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(ConfigurationError::NonFinite { field, index }),
        None => Ok(()),
    }
}

fn check_non_negative(field: &'static str, values: &[f64]) -> Result<()> {
    check_finite(field, values)?;
    match values.iter().enumerate().find(|(_, v)| **v < 0.0) {
        Some((index, &value)) => Err(ConfigurationError::NegativeCoefficient { field, index, value }),
        None => Ok(()),
    }
}
