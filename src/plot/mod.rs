//! SVG figures for the experiments.
//!
//! A [`Figure`] is a plain description of what to draw: titled axes plus a
//! list of series. [`Figure::render`] turns it into an SVG file with plotters.
//! Lattice snapshots use [`render_spin_grid`].

use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::prelude::*;
use tracing::debug;

use crate::error::{CpError, Result};

fn plot_err<E: std::fmt::Display>(e: E) -> CpError {
    CpError::Plot(e.to_string())
}

/// How a series is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Style {
    Line,
    Points,
    /// Vertical bars centred on each x with the given width.
    Bars(f64),
}

#[derive(Clone, Debug)]
pub struct Series {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: Style,
}

impl Series {
    pub fn line(points: Vec<(f64, f64)>) -> Self {
        Self { label: None, points, style: Style::Line }
    }

    pub fn points(points: Vec<(f64, f64)>) -> Self {
        Self { label: None, points, style: Style::Points }
    }

    pub fn bars(points: Vec<(f64, f64)>, width: f64) -> Self {
        Self { label: None, points, style: Style::Bars(width) }
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct Figure {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Option<Range<f64>>,
    pub y_range: Option<Range<f64>>,
    pub log_x: bool,
    pub log_y: bool,
    pub size: (u32, u32),
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_range: None,
            y_range: None,
            log_x: false,
            log_y: false,
            size: (800, 600),
            series: Vec::new(),
        }
    }

    pub fn x_range(mut self, range: Range<f64>) -> Self {
        self.x_range = Some(range);
        self
    }

    pub fn y_range(mut self, range: Range<f64>) -> Self {
        self.y_range = Some(range);
        self
    }

    pub fn log_log(mut self) -> Self {
        self.log_x = true;
        self.log_y = true;
        self
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    pub fn with(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Axis ranges, from the explicit ranges or else from the data.
    ///
    /// On a log axis non-positive values are ignored.
    fn ranges(&self) -> Result<(Range<f64>, Range<f64>)> {
        let x = match &self.x_range {
            Some(r) => r.clone(),
            None => self.data_range(|p| p.0, self.log_x)?,
        };
        let y = match &self.y_range {
            Some(r) => r.clone(),
            None => self.data_range(|p| p.1, self.log_y)?,
        };
        Ok((x, y))
    }

    fn data_range(&self, coord: impl Fn(&(f64, f64)) -> f64, log: bool) -> Result<Range<f64>> {
        let (lo, hi) = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(&coord))
            .filter(|v| v.is_finite() && (!log || *v > 0.0))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !lo.is_finite() {
            return Err(CpError::Plot(format!("no finite data in figure '{}'", self.title)));
        }
        if log {
            return Ok(if hi > lo { lo..hi } else { lo / 10.0..hi * 10.0 });
        }
        let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 * lo.abs().max(1.0) };
        Ok(lo - pad..hi + pad)
    }

    pub fn render<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let (x_range, y_range) = self.ranges()?;
        debug!(title = %self.title, path = %path.display(), "rendering figure");

        let root = SVGBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let mut builder = ChartBuilder::on(&root);
        builder
            .caption(&self.title, ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60);

        match (self.log_x, self.log_y) {
            (false, false) => {
                let chart = builder.build_cartesian_2d(x_range, y_range).map_err(plot_err)?;
                self.draw_into(chart)?;
            }
            (true, false) => {
                let chart = builder.build_cartesian_2d(x_range.log_scale(), y_range).map_err(plot_err)?;
                self.draw_into(chart)?;
            }
            (false, true) => {
                let chart = builder.build_cartesian_2d(x_range, y_range.log_scale()).map_err(plot_err)?;
                self.draw_into(chart)?;
            }
            (true, true) => {
                let chart = builder
                    .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
                    .map_err(plot_err)?;
                self.draw_into(chart)?;
            }
        }
        root.present().map_err(plot_err)?;
        Ok(())
    }

    fn draw_into<'a, X, Y>(&self, mut chart: ChartContext<'a, SVGBackend<'a>, Cartesian2d<X, Y>>) -> Result<()>
    where
        X: Ranged<ValueType = f64> + ValueFormatter<f64>,
        Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
    {
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(plot_err)?;

        let mut any_label = false;
        for (i, series) in self.series.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.9);
            let points = series.points.iter().copied().filter(|(x, y)| x.is_finite() && y.is_finite());
            let annotation = match series.style {
                Style::Line => chart
                    .draw_series(LineSeries::new(points, color.stroke_width(1)))
                    .map_err(plot_err)?,
                Style::Points => chart
                    .draw_series(points.map(|p| Circle::new(p, 1, color.filled())))
                    .map_err(plot_err)?,
                Style::Bars(width) => chart
                    .draw_series(points.map(|(x, h)| {
                        Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, h)], color.mix(0.5).filled())
                    }))
                    .map_err(plot_err)?,
            };
            if let Some(label) = &series.label {
                any_label = true;
                annotation
                    .label(label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            }
        }

        if any_label {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(plot_err)?;
        }
        Ok(())
    }
}

/// Draw a square ±1 lattice, spin up black and spin down white.
pub fn render_spin_grid<P: AsRef<Path>>(path: P, title: &str, size: usize, spins: &[i8]) -> Result<()> {
    if spins.len() != size * size {
        return Err(CpError::Shape(format!("{} spins for a {}x{} lattice", spins.len(), size, size)));
    }
    let root = SVGBackend::new(path.as_ref(), (640, 680)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;
    let n = size as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .build_cartesian_2d(0.0..n, 0.0..n)
        .map_err(plot_err)?;

    chart
        .draw_series(spins.iter().enumerate().filter(|(_, s)| **s > 0).map(|(k, _)| {
            let (i, j) = ((k / size) as f64, (k % size) as f64);
            Rectangle::new([(j, n - i - 1.0), (j + 1.0, n - i)], BLACK.filled())
        }))
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_range_is_padded() {
        let fig = Figure::new("t", "x", "y").with(Series::line(vec![(0.0, 1.0), (2.0, 3.0)]));
        let (x, y) = fig.ranges().unwrap();
        assert!(x.start < 0.0 && x.end > 2.0);
        assert!(y.start < 1.0 && y.end > 3.0);
    }

    #[test]
    fn test_log_range_skips_non_positive() {
        let mut fig = Figure::new("t", "h", "err").log_log();
        fig.push(Series::line(vec![(0.0, 0.0), (1e-3, 1e-6), (1.0, 1e-2)]));
        let (x, y) = fig.ranges().unwrap();
        assert_eq!(x, 1e-3..1.0);
        assert_eq!(y, 1e-6..1e-2);
    }

    #[test]
    fn test_empty_figure_is_error() {
        let fig = Figure::new("empty", "x", "y");
        assert!(matches!(fig.ranges(), Err(CpError::Plot(_))));
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.svg");
        Figure::new("line", "x", "y")
            .with(Series::line((0..10).map(|i| (i as f64, (i * i) as f64)).collect()).labelled("x^2"))
            .render(&path)
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_render_log_axes_with_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.svg");
        let steps: Vec<f64> = (1..=20).map(|i| 10f64.powi(-i)).collect();
        Figure::new("errors", "h", "relative error")
            .log_log()
            .with(Series::line(steps.iter().map(|&h| (h, h)).collect()).labelled("forward"))
            .with(Series::points(steps.iter().map(|&h| (h, h * h)).collect()).labelled("central"))
            .render(&path)
            .unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("forward") && svg.contains("central"));
    }

    #[test]
    fn test_spin_grid_shape_checked() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_spin_grid(dir.path().join("s.svg"), "s", 3, &[1; 8]).unwrap_err();
        assert!(matches!(err, CpError::Shape(_)));
    }
}
