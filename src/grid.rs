//! Numeric 2D grids for the surface plot.
//!
//! The first row and the first column of the csv hold the legend values of the
//! two ground axes; the top-left cell is ignored. Everything else is a value.

use crate::canvas::{render_error, OutputFormat};
use crate::error::{PlotError, Result};
use crate::linspace::Linspace;
use crate::min_and_max;
use crate::pdf::write_pdf;
use crate::table::{load, Table};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// header row, one value per grid column
    pub x_legend: Vec<f64>,
    /// header column, one value per grid row
    pub y_legend: Vec<f64>,
    /// values[row][column]
    pub values: Vec<Vec<f64>>,
}

/// One quadrilateral of the surface, corners as (x, y, value)
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub corners: [(f64, f64, f64); 4],
    pub mean: f64,
}

fn parse_cell(table: &Table, row: usize, col: usize) -> Result<f64> {
    let cell = table.rows[row][col].trim();
    let parsed = cell.parse::<f64>().ok().filter(|v| !v.is_infinite());
    parsed.ok_or_else(|| PlotError::NonNumeric {
        label: if row == 0 || col == 0 {
            "legend".to_string()
        } else {
            table.rows[0][col].clone()
        },
        row,
        value: cell.to_string(),
    })
}

impl Grid {
    pub fn load(path: &Path) -> Result<Grid> {
        Grid::from_table(&load(path)?)
    }

    pub fn from_table(table: &Table) -> Result<Grid> {
        let width = table.check_rectangular()?;
        let height = table.row_count();
        if height < 3 || width < 3 {
            return Err(PlotError::GridTooSmall {
                rows: height,
                columns: width,
            });
        }
        let x_legend = (1..width)
            .map(|c| parse_cell(table, 0, c))
            .collect::<Result<Vec<f64>>>()?;
        let y_legend = (1..height)
            .map(|r| parse_cell(table, r, 0))
            .collect::<Result<Vec<f64>>>()?;
        let values = (1..height)
            .map(|r| {
                (1..width)
                    .map(|c| parse_cell(table, r, c))
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;
        debug!("grid of {}x{} values", values.len(), x_legend.len());
        Ok(Grid {
            x_legend,
            y_legend,
            values,
        })
    }

    /// Smallest and largest non-NAN value
    pub fn value_range(&self) -> Result<(f64, f64)> {
        let all: Vec<f64> = self.values.iter().flatten().copied().collect();
        min_and_max(&all).ok_or_else(|| PlotError::EmptyPlot("grid has no values".to_string()))
    }

    /// Cells between neighbouring grid points; cells touching a NAN are left out
    pub fn cells(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for r in 0..self.y_legend.len().saturating_sub(1) {
            for c in 0..self.x_legend.len().saturating_sub(1) {
                let (x0, x1) = (self.x_legend[c], self.x_legend[c + 1]);
                let (y0, y1) = (self.y_legend[r], self.y_legend[r + 1]);
                let corners = [
                    (x0, y0, self.values[r][c]),
                    (x1, y0, self.values[r][c + 1]),
                    (x1, y1, self.values[r + 1][c + 1]),
                    (x0, y1, self.values[r + 1][c]),
                ];
                if corners.iter().any(|p| p.2.is_nan()) {
                    continue;
                }
                let mean = corners.iter().map(|p| p.2).sum::<f64>() / 4.;
                cells.push(Cell { corners, mean });
            }
        }
        cells
    }
}

/// Diverging blue to red colour map, `t` in [0, 1]
pub fn coolwarm(t: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59., 76., 192.);
    const MID: (f64, f64, f64) = (221., 221., 221.);
    const WARM: (f64, f64, f64) = (180., 4., 38.);
    if t.is_nan() {
        return RGBColor(128, 128, 128);
    }
    let t = t.max(0.).min(1.);
    let (a, b, p) = if t < 0.5 {
        (COLD, MID, t * 2.)
    } else {
        (MID, WARM, (t - 0.5) * 2.)
    };
    let lerp = |u: f64, v: f64| ((1. - p) * u + p * v).round() as u8;
    RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
}

fn axis_range(v: &[f64], fraction: f64) -> Range<f64> {
    let (min, max) = min_and_max(v).unwrap_or((0., 1.));
    let span = max - min;
    let pad = if span > 0. { span * fraction } else { 1. };
    (min - pad)..(max + pad)
}

/// Loads the grid at `input` and renders it to `output`, png, pdf or svg.
pub fn plot_surface(input: &Path, output: &Path) -> Result<()> {
    OutputFormat::from_path(output)?;
    let grid = Grid::load(input)?;
    let title = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    render_surface(&grid, output, &title)
}

pub fn render_surface(grid: &Grid, output: &Path, title: &str) -> Result<()> {
    let format = OutputFormat::from_path(output)?;
    info!("Generating {}", output.display());
    let drawn = match format {
        OutputFormat::Png => draw_surface(
            BitMapBackend::new(output, (1200, 900)).into_drawing_area(),
            grid,
            title,
        ),
        OutputFormat::Svg => draw_surface(
            SVGBackend::new(output, (1200, 900)).into_drawing_area(),
            grid,
            title,
        ),
        OutputFormat::Pdf => {
            let mut svg = String::new();
            draw_surface(
                SVGBackend::with_string(&mut svg, (1200, 900)).into_drawing_area(),
                grid,
                title,
            )
            .map_err(|e| render_error(output, e))?;
            return write_pdf(&svg, output);
        }
    };
    drawn.map_err(|e| render_error(output, e))
}

fn draw_surface<DB>(
    root: DrawingArea<DB, Shift>,
    grid: &Grid,
    title: &str,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (vmin, vmax) = grid.value_range()?;
    let vspan = if vmax > vmin { vmax - vmin } else { 1. };
    let vrange = axis_range(&[vmin, vmax], 0.05);

    root.fill(&WHITE)?;
    let width = root.dim_in_pixel().0 as i32;
    let (plot_area, bar_area) = root.split_horizontally(width - 160);

    // plotters draws the y axis upwards, so the values go on y and the
    // legend of the csv rows on z
    let mut chart = ChartBuilder::on(&plot_area)
        .caption(title, ("sans-serif", 30))
        .margin(20)
        .build_cartesian_3d(
            axis_range(&grid.x_legend, 0.),
            vrange.clone(),
            axis_range(&grid.y_legend, 0.),
        )?;
    chart.with_projection(|mut pb| {
        pb.pitch = 0.5;
        pb.yaw = 0.6;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .label_style(("sans-serif", 16))
        .y_labels(10)
        .y_formatter(&|v| format!("{:.2}", v))
        .draw()?;
    chart.draw_series(grid.cells().into_iter().map(|cell| {
        let color = coolwarm((cell.mean - vmin) / vspan);
        let points: Vec<(f64, f64, f64)> = cell.corners.iter().map(|&(x, y, v)| (x, v, y)).collect();
        Polygon::new(points, color.filled())
    }))?;

    let mut bar = ChartBuilder::on(&bar_area)
        .margin_top(80)
        .margin_bottom(80)
        .margin_right(20)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..1f64, vrange)?;
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(10)
        .y_label_formatter(&|v| format!("{:.2}", v))
        .label_style(("sans-serif", 16))
        .draw()?;
    let steps: Vec<f64> = Linspace::new(vmin, vmax, 65).collect();
    bar.draw_series(steps.windows(2).map(|w| {
        let color = coolwarm(((w[0] + w[1]) / 2. - vmin) / vspan);
        Rectangle::new([(0., w[0]), (1., w[1])], color.filled())
    }))?;

    root.present()?;
    Ok(())
}
