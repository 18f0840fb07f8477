//! Drawing of the comparison charts.
//!
//! Every chart is drawn onto a `BitMapBackend` and saved as PNG. Line charts
//! take one `Series` per policy, bar charts one `Bar` per row of input.

use crate::errors::*;
use crate::record::SpeedSample;
use plotters::coord::Shift;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, Circle, Color, Cross, DashedLineSeries, DrawingArea,
    IntoDrawingArea, IntoLogRange, IntoSegmentedCoord, LineSeries, PathElement, RGBColor,
    Rectangle, SegmentValue, SeriesLabelPosition, BLACK, WHITE,
};
use std::error::Error as StdError;
use std::path::Path;

/// Size of `speed_comparison.png`, two panels side by side.
pub const SPEED_SIZE: (u32, u32) = (1400, 600);

/// Size of `utilization_comparison.png`.
pub const UTILIZATION_SIZE: (u32, u32) = (1000, 600);

/// Size of both bar charts.
pub const BAR_SIZE: (u32, u32) = (800, 600);

const FONT: &str = "sans-serif";
const MARKER_SIZE: i32 = 4;

type DrawResult = ::std::result::Result<(), Box<dyn StdError>>;

/// A line series: one policy's samples.
pub struct Series<T> {
    /// legend entry
    pub label: String,

    /// line and marker color
    pub color: RGBColor,

    /// the data, in file order
    pub samples: Vec<T>,
}

/// A single bar.
#[derive(Debug, Clone)]
pub struct Bar {
    /// label under the bar
    pub label: String,

    /// height of the bar
    pub value: f64,

    /// fill color
    pub color: RGBColor,
}

/// Title and axes of a bar chart.
pub struct BarLayout<'a> {
    /// chart caption
    pub title: &'a str,

    /// description of the y axis
    pub y_desc: &'a str,

    /// fixed upper bound of the y axis; derived from the data when `None`
    pub y_max: Option<f64>,
}

/// Draws `tmalloc()` and `tfree()` speed against allocation size, on log-log
/// axes (base 2 for the size, base 10 for the time).
pub fn speed_comparison<P: AsRef<Path>>(path: P, series: &[Series<SpeedSample>]) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, SPEED_SIZE).into_drawing_area();
    let malloc = points_of(series, |p| (p.size, p.malloc_time));
    let free = points_of(series, |p| (p.size, p.free_time));
    draw_speed(&root, &malloc, &free).map_err(|e| chart_error(path, e))
}

/// Draws memory utilization over time, one line per policy.
pub fn utilization_comparison<P: AsRef<Path>>(
    path: P,
    series: &[Series<(f64, f64)>],
) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, UTILIZATION_SIZE).into_drawing_area();
    draw_utilization(&root, series).map_err(|e| chart_error(path, e))
}

/// Draws one bar per entry, in the given order.
pub fn bar_chart<P: AsRef<Path>>(path: P, layout: &BarLayout, bars: &[Bar]) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    draw_bars(&root, layout, bars).map_err(|e| chart_error(path, e))
}

fn chart_error(path: &Path, e: Box<dyn StdError>) -> Error {
    ErrorKind::Chart(format!("{} ({})", path.display(), e)).into()
}

/// Projects every series onto (x, y) pairs that can sit on a log axis.
fn points_of<F>(series: &[Series<SpeedSample>], f: F) -> Vec<Series<(f64, f64)>>
where
    F: Fn(&SpeedSample) -> (f64, f64),
{
    series
        .iter()
        .map(|s| {
            let points = s.samples
                .iter()
                .map(|t| f(t))
                .filter(|&(x, y)| {
                    let keep = x > 0.0 && y > 0.0;
                    if !keep {
                        debug!("{}: dropping ({}, {}) from log axis", s.label, x, y);
                    }
                    keep
                })
                .collect();
            Series {
                label: s.label.clone(),
                color: s.color,
                samples: points,
            }
        })
        .collect()
}

fn draw_speed(
    root: &DrawingArea<BitMapBackend, Shift>,
    malloc: &[Series<(f64, f64)>],
    free: &[Series<(f64, f64)>],
) -> DrawResult {
    root.fill(&WHITE)?;
    let (left, right) = root.split_horizontally(SPEED_SIZE.0 / 2);
    draw_speed_panel(&left, "tmalloc() Speed vs. Allocation Size", malloc, false)?;
    draw_speed_panel(&right, "tfree() Speed vs. Allocation Size", free, true)?;
    root.present()?;
    Ok(())
}

fn draw_speed_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    series: &[Series<(f64, f64)>],
    dashed: bool,
) -> DrawResult {
    let (x_lo, x_hi) = log_bounds(xs(series), (1.0, 2.0));
    let (y_lo, y_hi) = log_bounds(ys(series), (1.0, 10.0));

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (x_lo..x_hi).log_scale().base(2.0),
            (y_lo..y_hi).log_scale(),
        )?;

    chart
        .configure_mesh()
        .x_desc("Allocation Size (Bytes) [Log Scale]")
        .y_desc("Time (ns) [Log Scale]")
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.25))
        .draw()?;

    for s in series.iter().filter(|s| !s.samples.is_empty()) {
        let color = s.color;
        let anno = if dashed {
            chart.draw_series(DashedLineSeries::new(
                s.samples.iter().cloned(),
                6,
                4,
                color.stroke_width(1),
            ))?
        } else {
            chart.draw_series(LineSeries::new(s.samples.iter().cloned(), color.stroke_width(1)))?
        };
        anno.label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        if dashed {
            chart.draw_series(
                s.samples
                    .iter()
                    .map(|&p| Cross::new(p, MARKER_SIZE, color.stroke_width(1))),
            )?;
        } else {
            chart.draw_series(
                s.samples
                    .iter()
                    .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
            )?;
        }
    }

    if series.iter().any(|s| !s.samples.is_empty()) {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_utilization(
    root: &DrawingArea<BitMapBackend, Shift>,
    series: &[Series<(f64, f64)>],
) -> DrawResult {
    root.fill(&WHITE)?;
    let (x_lo, x_hi) = linear_bounds(xs(series), (0.0, 1.0));
    let (y_lo, y_hi) = linear_bounds(ys(series), (0.0, 100.0));

    let mut chart = ChartBuilder::on(root)
        .caption("Memory Utilization Over Time", (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("Time (ns)")
        .y_desc("Memory Utilization (%)")
        .light_line_style(BLACK.mix(0.05))
        .bold_line_style(BLACK.mix(0.25))
        .draw()?;

    let mut labeled = false;
    for s in series.iter().filter(|s| !s.samples.is_empty()) {
        let style = s.color.mix(0.7);
        chart
            .draw_series(LineSeries::new(s.samples.iter().cloned(), style.stroke_width(1)))?
            .label(s.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        labeled = true;
    }

    if labeled {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    root.present()?;
    Ok(())
}

fn draw_bars(
    root: &DrawingArea<BitMapBackend, Shift>,
    layout: &BarLayout,
    bars: &[Bar],
) -> DrawResult {
    root.fill(&WHITE)?;
    let y_max = layout.y_max.unwrap_or_else(|| {
        let max = bars.iter().map(|b| b.value).fold(0.0, f64::max);
        if max > 0.0 { max * 1.05 } else { 1.0 }
    });
    let y_min = bars.iter().map(|b| b.value).fold(0.0, f64::min);

    let mut chart = ChartBuilder::on(root)
        .caption(layout.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..bars.len() as u32).into_segmented(), y_min..y_max)?;

    let label_of = |v: &SegmentValue<u32>| match *v {
        SegmentValue::CenterOf(i) => bars.get(i as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len().max(1))
        .x_label_formatter(&label_of)
        .x_desc("Allocation Policy")
        .y_desc(layout.y_desc)
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.2))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, b)| {
        let i = i as u32;
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), b.value),
            ],
            b.color.mix(0.8).filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    root.present()?;
    Ok(())
}

fn xs<'a>(series: &'a [Series<(f64, f64)>]) -> impl Iterator<Item = f64> + 'a {
    series.iter().flat_map(|s| s.samples.iter().map(|p| p.0))
}

fn ys<'a>(series: &'a [Series<(f64, f64)>]) -> impl Iterator<Item = f64> + 'a {
    series.iter().flat_map(|s| s.samples.iter().map(|p| p.1))
}

/// Range of the positive values, padded so the extremes don't sit on the
/// border. `default` is used when there is nothing to show.
fn log_bounds<I: Iterator<Item = f64>>(values: I, default: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| *v > 0.0 && v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        default
    } else {
        (lo / 1.5, hi * 1.5)
    }
}

fn linear_bounds<I: Iterator<Item = f64>>(values: I, default: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        default
    } else if lo == hi {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pt(size: f64, malloc_time: f64, free_time: f64) -> SpeedSample {
        SpeedSample {
            size: size,
            malloc_time: malloc_time,
            free_time: free_time,
        }
    }

    #[test]
    fn bounds() {
        assert_eq!(log_bounds(Vec::<f64>::new().into_iter(), (1.0, 2.0)), (1.0, 2.0));
        assert_eq!(log_bounds(vec![0.0, -3.0].into_iter(), (1.0, 2.0)), (1.0, 2.0));
        assert_eq!(log_bounds(vec![3.0, 0.0, 6.0].into_iter(), (1.0, 2.0)), (2.0, 9.0));

        assert_eq!(linear_bounds(Vec::<f64>::new().into_iter(), (0.0, 1.0)), (0.0, 1.0));
        assert_eq!(linear_bounds(vec![5.0].into_iter(), (0.0, 1.0)), (4.0, 6.0));
        assert_eq!(linear_bounds(vec![0.0, 100.0].into_iter(), (0.0, 1.0)), (-5.0, 105.0));
    }

    #[test]
    fn non_positive_points_leave_log_axis() {
        let series = vec![Series {
            label: "First Fit".to_string(),
            color: BLACK,
            samples: vec![pt(0.0, 1.0, 1.0), pt(8.0, 0.0, 2.0), pt(16.0, 3.0, 4.0)],
        }];
        let malloc = points_of(&series, |p| (p.size, p.malloc_time));
        assert_eq!(malloc[0].samples, vec![(16.0, 3.0)]);
        let free = points_of(&series, |p| (p.size, p.free_time));
        assert_eq!(free[0].samples, vec![(8.0, 2.0), (16.0, 4.0)]);
    }

    #[test]
    fn empty_charts_are_still_written() {
        let dir = TempDir::new().unwrap();
        let speed = dir.path().join("speed_comparison.png");
        speed_comparison(&speed, &[]).unwrap();
        assert!(fs::metadata(&speed).unwrap().len() > 0);

        let util = dir.path().join("utilization_comparison.png");
        utilization_comparison(&util, &[]).unwrap();
        assert!(fs::metadata(&util).unwrap().len() > 0);
    }

    #[test]
    fn bars_are_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("overhead_bar.png");
        let layout = BarLayout {
            title: "Data Structure Overhead by Policy",
            y_desc: "Data Structure Overhead (Bytes)",
            y_max: None,
        };
        let bars = vec![
            Bar {
                label: "First Fit".to_string(),
                value: 1024.0,
                color: BLACK,
            },
            Bar {
                label: "Next Fit".to_string(),
                value: 96.0,
                color: BLACK,
            },
        ];
        bar_chart(&path, &layout, &bars).unwrap();
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }
}
