//! 構成エラーの定義。

use thiserror::Error;

/// 機械系の操作で使う`Result`型。
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// 系の構築時、またはシミュレーション開始時に検出される不正な構成。
///
/// どの場合も呼び出し側に返され、内部で回復されることはありません。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// 質点が1つもない。
    #[error("質点が1つもありません")]
    EmptySystem,

    /// 系列の長さが質点数と一致しない。
    #[error("'{field}' の長さが不正です (期待値: {expected}, 実際: {actual})")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// 結合が範囲外の質点を参照している。
    #[error("結合 {coupling} が範囲外の質点 {index} を参照しています (質点数: {bodies})")]
    CouplingIndexOutOfRange {
        coupling: usize,
        index: usize,
        bodies: usize,
    },

    /// 結合の両端が同じ質点。
    #[error("結合 {coupling} の両端が同じ質点 {body} です")]
    SelfCoupling { coupling: usize, body: usize },

    /// 質量が正でない。
    #[error("質点 {body} の質量は正である必要があります: {value}")]
    NonPositiveMass { body: usize, value: f64 },

    /// 減衰係数やばね定数が負。
    #[error("'{field}[{index}]' は非負である必要があります: {value}")]
    NegativeCoefficient {
        field: &'static str,
        index: usize,
        value: f64,
    },

    /// 有限でない値 (NaN / 無限大)。
    #[error("'{field}[{index}]' が有限ではありません")]
    NonFinite { field: &'static str, index: usize },

    /// シミュレーション時間が正でない。
    #[error("シミュレーション時間は正の有限値である必要があります: {0}")]
    InvalidDuration(f64),

    /// 時間刻みが正でない。
    #[error("時間刻みは正の有限値である必要があります: {0}")]
    InvalidStep(f64),

    /// ステップ数が多すぎて時系列を保持できない。
    #[error("T = {t_end}, h = {step} ではステップ数が多すぎて時系列を保持できません")]
    TooManySteps { t_end: f64, step: f64 },

    /// 積分中に状態が発散した。
    #[error("時刻 {time} で状態が発散しました。時間刻みを小さくしてください")]
    Diverged { time: f64 },
}

impl ConfigurationError {
    /// 長さ不一致エラーを作成します。
    #[must_use]
    pub const fn length_mismatch(field: &'static str, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            field,
            expected,
            actual,
        }
    }
}
