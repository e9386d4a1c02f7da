use std::path::Path;

use plotters::prelude::*;

use crate::trajectory::Trajectory;

/// 各質点の変位の時間変化をグラフとしてPNGファイルに出力します。
///
/// 質点ごとに1本の線を描き、凡例に質点番号を表示します。
pub fn plot_trajectory<P: AsRef<Path>>(
    trajectory: &Trajectory,
    path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let times = trajectory.times();
    let (Some(&t_start), Some(&t_end)) = (times.first(), times.last()) else {
        return Err("描画する時系列が空です。".into());
    };
    // サンプルが1つだけのときも軸の幅が0にならないようにする
    let t_end = if t_end > t_start { t_end } else { t_start + 1.0 };
    let amplitude = trajectory.max_displacement().max(1e-3) * 1.1;

    let root = BitMapBackend::new(path.as_ref(), (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Displacement History", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(t_start..t_end, -amplitude..amplitude)?;
    chart
        .configure_mesh()
        .y_desc("Displacement x(t)")
        .x_desc("Time t")
        .draw()?;

    for body in 0..trajectory.num_bodies() {
        let style = Palette99::pick(body).stroke_width(2);
        chart
            .draw_series(LineSeries::new(trajectory.body_positions(body), style))?
            .label(format!("Mass {body}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
