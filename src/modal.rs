//! 質量・減衰・剛性行列と非減衰固有振動数。
//!
//! 剛性行列は各質点の原点ばねを対角に、結合ばねをグラフラプラシアンとして加えたものです。

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::model::MechanicalSystemConfig;

/// 質量行列 `M = diag(m)`。
pub fn mass_matrix(config: &MechanicalSystemConfig) -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_column_slice(config.masses()))
}

/// 減衰行列 `C = diag(c)`。
pub fn damping_matrix(config: &MechanicalSystemConfig) -> DMatrix<f64> {
    DMatrix::from_diagonal(&DVector::from_column_slice(config.dampings()))
}

/// 剛性行列 `K`。`M x'' + C x' + K x = 0` を満たします。
pub fn stiffness_matrix(config: &MechanicalSystemConfig) -> DMatrix<f64> {
    let mut k = DMatrix::from_diagonal(&DVector::from_column_slice(config.spring_constants()));
    for coupling in config.couplings() {
        let [i, j] = coupling.bodies();
        let kc = coupling.stiffness();
        k[(i, i)] += kc;
        k[(j, j)] += kc;
        k[(i, j)] -= kc;
        k[(j, i)] -= kc;
    }
    k
}

/// 一定の外力と重力のもとでの静的つり合い位置 `K x* = f + M g`。
///
/// 剛性行列が特異 (原点ばねのない自由な部分系がある) なら`None`。
pub fn static_equilibrium(config: &MechanicalSystemConfig) -> Option<Vec<f64>> {
    let n = config.num_bodies();
    let forces = DVector::from_fn(n, |i, _| config.constant_force(i));
    stiffness_matrix(config)
        .lu()
        .solve(&forces)
        .map(|x| x.iter().copied().collect())
}

/// 非減衰固有角振動数 (昇順)。
///
/// 対称化した `M^{-1/2} K M^{-1/2}` の固有値 λ から `ω = sqrt(λ)` を求めます。
/// 丸め誤差で負になった固有値は0として扱います。
pub fn natural_frequencies(config: &MechanicalSystemConfig) -> Vec<f64> {
    let k = stiffness_matrix(config);
    let inv_sqrt_m = config.masses().iter().map(|m| m.sqrt().recip()).collect::<Vec<_>>();
    let n = config.num_bodies();
    let a = DMatrix::from_fn(n, n, |i, j| k[(i, j)] * inv_sqrt_m[i] * inv_sqrt_m[j]);

    let mut omegas = SymmetricEigen::new(a)
        .eigenvalues
        .iter()
        .map(|lambda| lambda.max(0.0).sqrt())
        .collect::<Vec<_>>();
    omegas.sort_by(f64::total_cmp);
    omegas
}
