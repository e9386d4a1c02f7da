//! 固定刻みの古典的4次ルンゲ＝クッタ法 (RK4)。
//!
//! 2階の常微分方程式 `x'' = a(x, x')` を、位置と速度を並べた 2N 次元の状態
//! `(x, v)` に対する1階の系 `x' = v, v' = a(x, v)` として積分します。

/// 加速度を与える2階の系。
pub trait SecondOrderSystem {
    /// 自由度の数 N。
    fn dimension(&self) -> usize;

    /// `(positions, velocities)` における加速度を`out`に書き込みます。
    fn accelerations(&self, positions: &[f64], velocities: &[f64], out: &mut [f64]);
}

/// 系の力学的状態。
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub time: f64,
}

impl State {
    /// 時刻0の状態を作成します。
    pub fn new(positions: Vec<f64>, velocities: Vec<f64>) -> Self {
        Self {
            positions,
            velocities,
            time: 0.0,
        }
    }

    /// すべての成分と時刻が有限かどうか。
    pub fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.positions.iter().all(|x| x.is_finite())
            && self.velocities.iter().all(|v| v.is_finite())
    }
}

/// 1段分の導関数 `(x', v')`。
struct Stage {
    dx: Vec<f64>,
    dv: Vec<f64>,
}

impl Stage {
    /// `(x, v)`での導関数を評価します。位置の導関数は速度そのものです。
    fn eval<S: SecondOrderSystem + ?Sized>(system: &S, x: &[f64], v: &[f64]) -> Self {
        let mut dv = vec![0.0; v.len()];
        system.accelerations(x, v, &mut dv);
        Self { dx: v.to_vec(), dv }
    }

    /// 基準状態`(x, v)`から`scale`だけ進めた状態を作ります。
    /// 位置と速度は同じ段の導関数から作ります。
    fn advance(&self, x: &[f64], v: &[f64], scale: f64) -> (Vec<f64>, Vec<f64>) {
        let xs = x.iter().zip(&self.dx).map(|(x, d)| x + scale * d).collect();
        let vs = v.iter().zip(&self.dv).map(|(v, d)| v + scale * d).collect();
        (xs, vs)
    }
}

/// `state`を時間刻み`h`だけ RK4 で進めます。`state.time`も`h`だけ進みます。
///
/// 現在の状態、2つの半ステップ推定、1つの全ステップ推定で導関数を評価し、
/// 重み `(1, 2, 2, 1) / 6` で合成します。
pub fn rk4_step<S: SecondOrderSystem + ?Sized>(system: &S, state: &mut State, h: f64) {
    debug_assert_eq!(state.positions.len(), system.dimension());
    debug_assert_eq!(state.velocities.len(), system.dimension());

    let x = &state.positions;
    let v = &state.velocities;
    let half = 0.5 * h;

    let k1 = Stage::eval(system, x, v);
    let (x2, v2) = k1.advance(x, v, half);
    let k2 = Stage::eval(system, &x2, &v2);
    let (x3, v3) = k2.advance(x, v, half);
    let k3 = Stage::eval(system, &x3, &v3);
    let (x4, v4) = k3.advance(x, v, h);
    let k4 = Stage::eval(system, &x4, &v4);

    combine(&mut state.positions, h, [k1.dx.as_slice(), k2.dx.as_slice(), k3.dx.as_slice(), k4.dx.as_slice()]);
    combine(&mut state.velocities, h, [k1.dv.as_slice(), k2.dv.as_slice(), k3.dv.as_slice(), k4.dv.as_slice()]);
    state.time += h;
}

fn combine(y: &mut [f64], h: f64, [d1, d2, d3, d4]: [&[f64]; 4]) {
    let sixth = h / 6.0;
    for (i, y) in y.iter_mut().enumerate() {
        *y += sixth * (d1[i] + 2.0 * d2[i] + 2.0 * d3[i] + d4[i]);
    }
}
