//! Runs a `PlotRequest`: one file, several files on one chart, or every csv
//! file of a directory to its own chart.

use crate::canvas::{show, Canvas, OutputFormat, Renderer};
use crate::error::{PlotError, Result};
use crate::series::{select, Series};
use crate::style::assemble;
use crate::table::{extract, load};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PlotMode {
    /// one csv to one chart
    Single { source: PathBuf, output: PathBuf },
    /// the same columns of every source on one chart
    Overlay {
        sources: Vec<PathBuf>,
        output: PathBuf,
    },
    /// every csv of `source_dir` to `dest_dir/<stem>.<format>`
    Directory {
        source_dir: PathBuf,
        dest_dir: PathBuf,
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub mode: PlotMode,
    pub x_index: usize,
    pub y_indices: Vec<usize>,
    /// open the written chart in a viewer, ignored for directories
    pub show: bool,
    /// reserved, directories are always scanned non-recursively
    pub recursive: bool,
    pub style_seed: usize,
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Fails on the first source that does not have the csv extension
pub fn check_csv_sources(sources: &[PathBuf]) -> Result<()> {
    match sources.iter().find(|p| !is_csv(p)) {
        Some(p) => Err(PlotError::InvalidArgument(format!(
            "{:?} is not a csv file",
            p.display().to_string()
        ))),
        None => Ok(()),
    }
}

pub fn check_directories(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    if !dest_dir.is_dir() {
        return Err(PlotError::PathNotFound {
            what: "output directory",
            path: dest_dir.to_path_buf(),
        });
    }
    if !source_dir.is_dir() {
        return Err(PlotError::PathNotFound {
            what: "csv directory (a directory holding csv files, not a csv file)",
            path: source_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// csv files directly inside `dir`, sorted by name
pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |e: std::io::Error| PlotError::Io {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && is_csv(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!("found {} csv files in {}", files.len(), dir.display());
    Ok(files)
}

pub fn output_path_for(dest_dir: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default().to_string_lossy();
    dest_dir.join(format!("{}.{}", stem, format.extension()))
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// load, extract and select in one go
pub fn series_from(path: &Path, x_index: usize, y_indices: &[usize]) -> Result<Vec<Series>> {
    let table = load(path)?;
    let columns = extract(&table)?;
    select(&columns, x_index, y_indices)
}

/// Runs the request on `canvas` and returns the written charts.
/// The first error stops the run, including the remaining files of a directory.
pub fn run<R: Renderer>(request: &PlotRequest, canvas: &mut Canvas<R>) -> Result<Vec<PathBuf>> {
    if request.recursive {
        warn!("--recursive is reserved, directories are scanned non-recursively");
    }
    let (x, ys, seed) = (request.x_index, &request.y_indices[..], request.style_seed);
    match &request.mode {
        PlotMode::Single { source, output } => {
            OutputFormat::from_path(output)?;
            let series = series_from(source, x, ys)?;
            let mut session = canvas.session();
            session.draw(assemble(series, seed, file_title(source)));
            session.save(output)?;
            if request.show {
                show(output);
            }
            Ok(vec![output.clone()])
        }
        PlotMode::Overlay { sources, output } => {
            check_csv_sources(sources)?;
            OutputFormat::from_path(output)?;
            let mut all = Vec::new();
            let mut labels = None;
            for source in sources {
                let series = series_from(source, x, ys)?;
                // axis labels follow the last file
                if let Some(first) = series.first() {
                    labels = Some((first.x_label.clone(), first.label.clone()));
                }
                let name = file_title(source);
                all.extend(series.into_iter().map(|s| s.with_source(name.as_str())));
            }
            let paths: Vec<String> = sources.iter().map(|p| p.display().to_string()).collect();
            let mut job = assemble(all, seed, format!("Multiple: {}", paths.join(", ")));
            if let Some((x_label, y_label)) = labels {
                job = job.with_axis_labels(x_label, y_label);
            }
            let mut session = canvas.session();
            session.draw(job);
            session.save(output)?;
            if request.show {
                show(output);
            }
            Ok(vec![output.clone()])
        }
        PlotMode::Directory {
            source_dir,
            dest_dir,
            format,
        } => {
            check_directories(source_dir, dest_dir)?;
            if request.show {
                warn!("charts of a directory are not shown, see {}", dest_dir.display());
            }
            let files = csv_files_in(source_dir)?;
            if files.is_empty() {
                info!("no csv files in {}", source_dir.display());
            }
            let mut written = Vec::with_capacity(files.len());
            for file in &files {
                let out = output_path_for(dest_dir, file, *format);
                let series = series_from(file, x, ys)?;
                let mut session = canvas.session();
                session.draw(assemble(series, seed, file_title(file)));
                session.save(&out)?;
                written.push(out);
            }
            Ok(written)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn csv_extension() {
        assert!(is_csv(Path::new("a.csv")));
        assert!(is_csv(Path::new("dir/A.CSV")));
        assert!(!is_csv(Path::new("b.txt")));
        assert!(!is_csv(Path::new("csv")));
    }

    #[test]
    fn first_non_csv_source_is_reported() {
        let sources = vec![PathBuf::from("a.csv"), PathBuf::from("b.txt"), PathBuf::from("c")];
        let err = check_csv_sources(&sources).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("b.txt"));
    }

    #[test]
    fn output_paths_reuse_the_stem() {
        let out = output_path_for(Path::new("out"), Path::new("in/run.1.csv"), OutputFormat::Svg);
        assert_eq!(out, PathBuf::from("out/run.1.svg"));
    }

    #[test]
    fn directories_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = check_directories(dir.path(), &missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PathNotFound);
        assert!(err.to_string().starts_with("output directory"));
        let err = check_directories(&missing, dir.path()).unwrap_err();
        assert!(err.to_string().starts_with("csv directory"));
        assert!(check_directories(dir.path(), dir.path()).is_ok());
    }
}
