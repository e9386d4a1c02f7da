//! シミュレーション結果の時系列。
//!
//! `simulate`のたびに作り直され、外部 (描画・CSV出力・テスト) からは読み取り専用です。

use std::collections::TryReserveError;
use std::io::Write;

/// サンプリングした時刻ごとの位置と速度。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    positions: Vec<Vec<f64>>,
    velocities: Vec<Vec<f64>>,
}

impl Trajectory {
    /// `samples`個分の容量を確保した空の時系列。確保できなければ`Err`を返します。
    pub(crate) fn try_with_capacity(samples: usize) -> Result<Self, TryReserveError> {
        let mut trajectory = Self::default();
        trajectory.times.try_reserve_exact(samples)?;
        trajectory.positions.try_reserve_exact(samples)?;
        trajectory.velocities.try_reserve_exact(samples)?;
        Ok(trajectory)
    }

    pub(crate) fn record(&mut self, time: f64, positions: &[f64], velocities: &[f64]) {
        self.times.push(time);
        self.positions.push(positions.to_vec());
        self.velocities.push(velocities.to_vec());
    }

    /// サンプル時刻 (狭義単調増加)。
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// 各サンプル時刻の位置。`positions()[k][i]`は時刻`times()[k]`における質点`i`の位置です。
    pub fn positions(&self) -> &[Vec<f64>] {
        &self.positions
    }

    /// 各サンプル時刻の速度。並びは`positions`と同じです。
    pub fn velocities(&self) -> &[Vec<f64>] {
        &self.velocities
    }

    /// サンプル数。
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// 質点数。空なら0。
    pub fn num_bodies(&self) -> usize {
        self.positions.first().map_or(0, Vec::len)
    }

    /// 質点`body`の`(時刻, 位置)`の列。描画用。
    pub fn body_positions(&self, body: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .zip(&self.positions)
            .map(move |(&t, x)| (t, x[body]))
    }

    /// 最後のサンプルの`(時刻, 位置, 速度)`。
    pub fn last(&self) -> Option<(f64, &[f64], &[f64])> {
        let k = self.len().checked_sub(1)?;
        Some((self.times[k], self.positions[k].as_slice(), self.velocities[k].as_slice()))
    }

    /// 全サンプルを通した変位の絶対値の最大値。
    pub fn max_displacement(&self) -> f64 {
        self.positions
            .iter()
            .flatten()
            .fold(0.0_f64, |acc, x| acc.max(x.abs()))
    }

    /// CSV として書き出します。
    ///
    /// ヘッダーは `time,x0,..,x{N-1},v0,..,v{N-1}` で、1行が1サンプルです。
    ///
    /// # Errors
    ///
    /// 書き込みに失敗した場合。
    pub fn write_csv<W: Write>(&self, out: W) -> csv::Result<()> {
        let n = self.num_bodies();
        let mut writer = csv::Writer::from_writer(out);
        let header = std::iter::once("time".to_string())
            .chain((0..n).map(|i| format!("x{i}")))
            .chain((0..n).map(|i| format!("v{i}")));
        writer.write_record(header)?;

        for ((t, x), v) in self.times.iter().zip(&self.positions).zip(&self.velocities) {
            writer.write_record(std::iter::once(t).chain(x).chain(v).map(f64::to_string))?;
        }
        writer.flush()?;
        Ok(())
    }
}
