//! # 多質点ばね系シミュレータ
//!
//! 原点ばねとダンパを持つ質点を結合ばねでつないだ系 (`MultiMechanicalSystem`) を
//! 4次ルンゲ＝クッタ法で時間発展させ、その時系列を記録します。
//!
//! 描画 (`plot`) と CSV 出力 (`Trajectory::write_csv`) は時系列を読み取るだけの利用側です。

pub mod cli;
pub mod error;
pub mod integrator;
pub mod logging;
pub mod modal;
pub mod model;
pub mod physics;
pub mod plot;
pub mod scenario;
pub mod simulation;
pub mod sweep;
pub mod system;
pub mod trajectory;

pub use error::{ConfigurationError, Result};
pub use integrator::{SecondOrderSystem, State};
pub use model::{Coupling, MechanicalSystemConfig};
pub use system::{MultiMechanicalSystem, SimulationStatus};
pub use trajectory::Trajectory;

/// 変位グラフを保存するファイル名
pub const PLOT_FILENAME: &str = "trajectory.png";

/// 時系列を保存するファイル名
pub const CSV_FILENAME: &str = "trajectory.csv";
