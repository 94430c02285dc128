//! Rendering surface and the plotters backed renderer.
//!
//! A `Canvas` accumulates `RenderJob`s until it is saved; whoever drives it is
//! responsible for clearing it, either explicitly or through a `CanvasSession`.

use crate::error::{PlotError, Result};
use crate::pdf::write_pdf;
use crate::series::AxisKind;
use crate::style::{Marker, RenderJob, Stroke, StyleToken};
use crate::{format_timestamp, min_and_max};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use std::ops::{Deref, DerefMut, Range};
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Raster (png) or vector (pdf, svg) output, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Pdf,
    Svg,
}

impl OutputFormat {
    /// Accepts the extension with or without the leading dot
    pub fn from_extension(ext: &str) -> Result<OutputFormat> {
        let ext = ext.trim_start_matches('.');
        if ext.eq_ignore_ascii_case("png") {
            Ok(OutputFormat::Png)
        } else if ext.eq_ignore_ascii_case("pdf") {
            Ok(OutputFormat::Pdf)
        } else if ext.eq_ignore_ascii_case("svg") {
            Ok(OutputFormat::Svg)
        } else {
            Err(PlotError::InvalidArgument(format!(
                "invalid output extension {:?}, expected .png, .pdf or .svg",
                ext
            )))
        }
    }

    pub fn from_path(path: &Path) -> Result<OutputFormat> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => OutputFormat::from_extension(ext),
            None => Err(PlotError::InvalidArgument(format!(
                "output file {} has no extension, expected .png, .pdf or .svg",
                path.display()
            ))),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }
}

#[derive(Debug)]
pub struct SeriesData {
    pub legend: String,
    pub style: StyleToken,
    pub points: Vec<(f64, f64)>,
}

/// Numeric form of a `RenderJob`, with the axis ranges to draw
#[derive(Debug)]
pub struct PlotData {
    pub kind: AxisKind,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<SeriesData>,
}

fn padded(min: f64, max: f64, fraction: f64) -> Range<f64> {
    let span = max - min;
    let pad = if span > 0. { span * fraction } else { 1. };
    (min - pad)..(max + pad)
}

impl PlotData {
    pub fn from_job(job: &RenderJob) -> Result<PlotData> {
        let mut kind = None;
        let mut series = Vec::with_capacity(job.series.len());
        for styled in &job.series {
            let (k, points) = styled.series.points()?;
            match kind {
                None => kind = Some(k),
                Some(prev) if prev != k => {
                    return Err(PlotError::MixedXAxis {
                        label: styled.series.x_label.clone(),
                    })
                }
                _ => {}
            }
            series.push(SeriesData {
                legend: styled.series.legend(),
                style: styled.style,
                points,
            });
        }
        let xs: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.0))
            .collect();
        let ys: Vec<f64> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .collect();
        let (xmin, xmax) = min_and_max(&xs)
            .ok_or_else(|| PlotError::EmptyPlot(format!("no x values in {:?}", job.title)))?;
        let (ymin, ymax) = min_and_max(&ys)
            .ok_or_else(|| PlotError::EmptyPlot(format!("no y values in {:?}", job.title)))?;
        Ok(PlotData {
            kind: kind.unwrap_or(AxisKind::Numeric),
            x_range: padded(xmin, xmax, 1. / 20.),
            y_range: padded(ymin, ymax, 1. / 10.),
            series,
        })
    }
}

/// The rendering service: draws a job to an output file
pub trait Renderer {
    fn render(&mut self, job: &RenderJob, out: &Path) -> Result<()>;
}

/// Renders with plotters, png, pdf or svg according to the output extension
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    pub size: (u32, u32),
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        PlottersRenderer { size: (1600, 800) }
    }
}

impl Renderer for PlottersRenderer {
    fn render(&mut self, job: &RenderJob, out: &Path) -> Result<()> {
        let format = OutputFormat::from_path(out)?;
        let data = PlotData::from_job(job)?;
        let drawn = match format {
            OutputFormat::Png => {
                draw_chart(BitMapBackend::new(out, self.size).into_drawing_area(), job, &data)
            }
            OutputFormat::Svg => {
                draw_chart(SVGBackend::new(out, self.size).into_drawing_area(), job, &data)
            }
            OutputFormat::Pdf => {
                let mut svg = String::new();
                draw_chart(
                    SVGBackend::with_string(&mut svg, self.size).into_drawing_area(),
                    job,
                    &data,
                )
                .map_err(|e| render_error(out, e))?;
                return write_pdf(&svg, out);
            }
        };
        drawn.map_err(|e| render_error(out, e))
    }
}

pub(crate) fn render_error(out: &Path, e: Box<dyn std::error::Error>) -> PlotError {
    PlotError::Render(format!("{}: {}", out.display(), e))
}

fn rgb(style: &StyleToken) -> RGBColor {
    let (r, g, b) = style.rgb;
    RGBColor(r, g, b)
}

const DAY: f64 = 86_400.;

/// Tick label format for a datetime axis spanning `secs` seconds
fn datetime_xfmt(secs: f64) -> &'static str {
    if secs > 7. * DAY {
        "%y-%m-%d"
    } else if secs > DAY {
        "%m-%d %H"
    } else {
        "%d %H:%M"
    }
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    job: &RenderJob,
    data: &PlotData,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(&job.title, ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(100)
        .build_cartesian_2d(data.x_range.clone(), data.y_range.clone())?;

    let xfmt = datetime_xfmt(data.x_range.end - data.x_range.start);
    let datetime_label = |x: &f64| format_timestamp(*x, xfmt);
    let x_desc = match data.kind {
        AxisKind::Numeric => job.x_label.clone(),
        AxisKind::DateTime => format!("{} [{}]", job.x_label, xfmt.replace("%", "")),
    };
    let mut mesh = chart.configure_mesh();
    mesh.light_line_style(&TRANSPARENT)
        .bold_line_style(RGBColor(150, 150, 150).stroke_width(2))
        .set_all_tick_mark_size(2)
        .label_style(("sans-serif", 24))
        .x_desc(x_desc)
        .y_desc(job.y_label.as_str());
    if data.kind == AxisKind::DateTime {
        mesh.x_labels(14).x_label_formatter(&datetime_label);
    }
    mesh.draw()?;

    for s in &data.series {
        let color = rgb(&s.style);
        let line_style = color.stroke_width(2);

        // a NAN breaks the line, the same way missing readings leave a gap
        let runs = s
            .points
            .split(|p| p.0.is_nan() || p.1.is_nan())
            .filter(|run| !run.is_empty());
        for run in runs {
            match s.style.stroke {
                Stroke::Solid => {
                    chart.draw_series(LineSeries::new(run.iter().copied(), line_style))?;
                }
                Stroke::Dashed => {
                    chart.draw_series(DashedLineSeries::new(
                        run.iter().copied(),
                        10,
                        6,
                        line_style,
                    ))?;
                }
                Stroke::None => {}
            }
        }

        let finite = s
            .points
            .iter()
            .copied()
            .filter(|p| !p.0.is_nan() && !p.1.is_nan());
        match s.style.marker {
            Marker::None => {}
            Marker::Circle => {
                chart.draw_series(finite.map(|p| Circle::new(p, 4, color.filled())))?;
            }
            Marker::Triangle => {
                chart.draw_series(finite.map(|p| TriangleMarker::new(p, 6, color.filled())))?;
            }
            Marker::Square => {
                chart.draw_series(finite.map(|p| {
                    EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], color.filled())
                }))?;
            }
            Marker::Cross => {
                chart.draw_series(finite.map(|p| Cross::new(p, 5, line_style)))?;
            }
        }

        // legend entry only, nothing is drawn on the plot
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(s.legend.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 30, y)], line_style));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 20))
        .draw()?;
    root.present()?;
    Ok(())
}

/// The shared drawing surface of one or more charts.
/// Jobs drawn on it pile up until `clear` is called.
pub struct Canvas<R: Renderer> {
    renderer: R,
    layers: Vec<RenderJob>,
}

impl<R: Renderer> Canvas<R> {
    pub fn new(renderer: R) -> Canvas<R> {
        Canvas {
            renderer,
            layers: Vec::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn draw(&mut self, job: RenderJob) {
        debug!("drawing {} series on the canvas", job.series.len());
        self.layers.push(job);
    }

    pub fn is_clear(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Writes everything drawn since the last clear as one chart;
    /// title and axis labels are those of the last job.
    pub fn save(&mut self, out: &Path) -> Result<()> {
        let last = self
            .layers
            .last()
            .ok_or_else(|| PlotError::EmptyPlot(format!("canvas for {} is clear", out.display())))?;
        let mut merged = RenderJob {
            title: last.title.clone(),
            x_label: last.x_label.clone(),
            y_label: last.y_label.clone(),
            series: Vec::new(),
        };
        for layer in &self.layers {
            merged.series.extend(layer.series.iter().cloned());
        }
        info!("Generating {}", out.display());
        self.renderer.render(&merged, out)
    }

    /// Borrows the canvas for one chart; it is cleared when the session ends
    pub fn session(&mut self) -> CanvasSession<'_, R> {
        CanvasSession { canvas: self }
    }
}

pub struct CanvasSession<'a, R: Renderer> {
    canvas: &'a mut Canvas<R>,
}

impl<'a, R: Renderer> Deref for CanvasSession<'a, R> {
    type Target = Canvas<R>;

    fn deref(&self) -> &Canvas<R> {
        self.canvas
    }
}

impl<'a, R: Renderer> DerefMut for CanvasSession<'a, R> {
    fn deref_mut(&mut self) -> &mut Canvas<R> {
        self.canvas
    }
}

impl<'a, R: Renderer> Drop for CanvasSession<'a, R> {
    fn drop(&mut self) {
        self.canvas.clear();
    }
}

/// Opens a written chart with the platform viewer.
/// Failing to launch it is not an error, the file is already on disk.
pub fn show(path: &Path) {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(&["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    match cmd.arg(path).spawn() {
        Ok(_) => info!("showing {}", path.display()),
        Err(e) => warn!("could not open a viewer for {}: {}", path.display(), e),
    }
}
