use super::VERSION;
use crate::canvas::OutputFormat;
use crate::driver::{check_csv_sources, PlotMode, PlotRequest};
use crate::error::{PlotError, Result};
use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;

/// The CLI arguments as given, before any validation
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArgs {
    pub filepath: String,
    pub x_column: String,
    pub y_columns: String,
    pub output: String,
    pub echo_commands: bool,
    pub generate_plot: bool,
    pub recursive: bool,
    pub directory: bool,
    pub directory_ext: String,
    pub multiple_plots: bool,
    pub style_seed: String,
    pub verbose: bool,
}

pub fn cli_app<'a, 'b>() -> App<'a, 'b> {
    let arg_filepath = Arg::with_name("filepath")
        .help("csv file; a comma separated list of csv files with --multipleplots, a directory with --directory")
        .required(true)
        .index(1);
    let arg_x = Arg::with_name("X")
        .help("index of the column to plot on the x axis")
        .required(true)
        .index(2);
    let arg_y = Arg::with_name("Y")
        .help("index of the column to plot against x; for several columns use 1,2 or [1,2]")
        .required(true)
        .index(3);
    let arg_output = Arg::with_name("output")
        .help("output .png, .pdf or .svg file; the output directory with --directory")
        .required(true)
        .index(4);
    let arg_echo = Arg::with_name("echocommands")
        .help("print the received arguments and exit without plotting")
        .long("echocommands");
    let arg_generate = Arg::with_name("generateplot")
        .help("show the chart once written; ignored with --directory")
        .long("generateplot");
    let arg_recursive = Arg::with_name("recursive")
        .help("reserved, directories are scanned non-recursively")
        .long("recursive");
    let arg_directory = Arg::with_name("directory")
        .help("plot every csv file of the filepath directory to the output directory")
        .long("directory");
    let arg_directoryext = Arg::with_name("directoryext")
        .help("type of the charts written with --directory")
        .long("directoryext")
        .takes_value(true)
        .default_value(".pdf");
    let arg_multiple = Arg::with_name("multipleplots")
        .help("plot the same columns of several csv files on the same chart")
        .long("multipleplots");
    let arg_seed = Arg::with_name("styleseed")
        .help("offset into the palette for the first series")
        .long("styleseed")
        .takes_value(true)
        .default_value("0");
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose");
    App::new("plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("James Kent")
        .about("cli app to plot columns of csv files")
        .arg(arg_filepath)
        .arg(arg_x)
        .arg(arg_y)
        .arg(arg_output)
        .arg(arg_echo)
        .arg(arg_generate)
        .arg(arg_recursive)
        .arg(arg_directory)
        .arg(arg_directoryext)
        .arg(arg_multiple)
        .arg(arg_seed)
        .arg(arg_verbose)
}

/// Takes the CLI arguments that control the plotting of csv columns.
pub fn parse_cli() -> PlotArgs {
    PlotArgs::from_matches(&cli_app().get_matches())
}

/// Parses one column index
pub fn parse_index(s: &str) -> Result<usize> {
    s.trim().parse::<usize>().map_err(|_| {
        PlotError::InvalidArgument(format!("{:?} is not a column index", s.trim()))
    })
}

/// Parses `1`, `1,2` or `[1,2]`
pub fn parse_indices(s: &str) -> Result<Vec<usize>> {
    let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
    let indices = inner
        .split(',')
        .map(parse_index)
        .collect::<Result<Vec<usize>>>()?;
    Ok(indices)
}

impl PlotArgs {
    pub fn from_matches(m: &ArgMatches) -> PlotArgs {
        let value = |name: &str| m.value_of(name).unwrap_or_default().to_string();
        PlotArgs {
            filepath: value("filepath"),
            x_column: value("X"),
            y_columns: value("Y"),
            output: value("output"),
            echo_commands: m.is_present("echocommands"),
            generate_plot: m.is_present("generateplot"),
            recursive: m.is_present("recursive"),
            directory: m.is_present("directory"),
            directory_ext: value("directoryext"),
            multiple_plots: m.is_present("multipleplots"),
            style_seed: value("styleseed"),
            verbose: m.is_present("verbose"),
        }
    }

    /// Validates the arguments that can be checked without touching the
    /// filesystem; --multipleplots wins over --directory.
    pub fn into_request(self) -> Result<PlotRequest> {
        let mode = if self.multiple_plots {
            // empty entries are kept so that "a.csv,,b.csv" is reported
            let sources: Vec<PathBuf> = self
                .filepath
                .split(',')
                .map(str::trim)
                .map(PathBuf::from)
                .collect();
            check_csv_sources(&sources)?;
            let output = PathBuf::from(&self.output);
            OutputFormat::from_path(&output)?;
            PlotMode::Overlay { sources, output }
        } else if self.directory {
            PlotMode::Directory {
                source_dir: PathBuf::from(&self.filepath),
                dest_dir: PathBuf::from(&self.output),
                format: OutputFormat::from_extension(&self.directory_ext)?,
            }
        } else {
            let output = PathBuf::from(&self.output);
            OutputFormat::from_path(&output)?;
            PlotMode::Single {
                source: PathBuf::from(&self.filepath),
                output,
            }
        };
        let style_seed = self.style_seed.trim().parse::<usize>().map_err(|_| {
            PlotError::InvalidArgument(format!("style seed {:?} is not a number", self.style_seed))
        })?;
        Ok(PlotRequest {
            mode,
            x_index: parse_index(&self.x_column)?,
            y_indices: parse_indices(&self.y_columns)?,
            show: self.generate_plot,
            recursive: self.recursive,
            style_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn args(argv: &[&str]) -> PlotArgs {
        let m = cli_app()
            .get_matches_from_safe(std::iter::once("plot").chain(argv.iter().copied()))
            .unwrap();
        PlotArgs::from_matches(&m)
    }

    #[test]
    fn single_file_request() {
        let req = args(&["data.csv", "0", "1,2", "chart.png", "--generateplot"])
            .into_request()
            .unwrap();
        assert_eq!(
            req.mode,
            PlotMode::Single {
                source: PathBuf::from("data.csv"),
                output: PathBuf::from("chart.png"),
            }
        );
        assert_eq!(req.x_index, 0);
        assert_eq!(req.y_indices, vec![1, 2]);
        assert!(req.show);
        assert_eq!(req.style_seed, 0);
    }

    #[test]
    fn bad_output_extension_fails_before_io() {
        let err = args(&["missing.csv", "0", "1", "chart.txt"])
            .into_request()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let err = args(&["missing.csv", "0", "1", "chart"])
            .into_request()
            .unwrap_err();
        assert!(err.to_string().contains(".pdf"));
    }

    #[test]
    fn pdf_output_is_accepted() {
        let req = args(&["data.csv", "0", "1", "chart.pdf"]).into_request().unwrap();
        assert_eq!(
            req.mode,
            PlotMode::Single {
                source: PathBuf::from("data.csv"),
                output: PathBuf::from("chart.pdf"),
            }
        );
    }

    #[test]
    fn overlay_rejects_non_csv() {
        let err = args(&["a.csv,b.txt", "0", "1", "chart.png", "--multipleplots"])
            .into_request()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("\"b.txt\" is not a csv file"));
    }

    #[test]
    fn overlay_rejects_empty_entries() {
        for list in &["a.csv,,b.csv", "a.csv,", ",b.csv"] {
            let err = args(&[list, "0", "1", "chart.png", "--multipleplots"])
                .into_request()
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert!(err.to_string().contains("\"\" is not a csv file"), "{}", err);
        }
    }

    #[test]
    fn overlay_request() {
        let req = args(&["a.csv, b.csv", "0", "[1]", "all.svg", "--multipleplots", "--directory"])
            .into_request()
            .unwrap();
        assert_eq!(
            req.mode,
            PlotMode::Overlay {
                sources: vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")],
                output: PathBuf::from("all.svg"),
            }
        );
        assert_eq!(req.y_indices, vec![1]);
    }

    #[test]
    fn directory_request() {
        let a = args(&["in", "0", "1", "out", "--directory", "--directoryext=.png", "--styleseed=4"]);
        let req = a.into_request().unwrap();
        assert_eq!(
            req.mode,
            PlotMode::Directory {
                source_dir: PathBuf::from("in"),
                dest_dir: PathBuf::from("out"),
                format: OutputFormat::Png,
            }
        );
        assert_eq!(req.style_seed, 4);

        let default_ext = args(&["in", "0", "1", "out", "--directory"]).into_request().unwrap();
        match default_ext.mode {
            PlotMode::Directory { format, .. } => assert_eq!(format, OutputFormat::Pdf),
            m => panic!("unexpected mode {:?}", m),
        }
    }

    #[test]
    fn index_syntax() {
        assert_eq!(parse_indices("[1, 3,2]").unwrap(), vec![1, 3, 2]);
        assert_eq!(parse_indices("4").unwrap(), vec![4]);
        for bad in &["a", "1,,2", "-1", "[]"] {
            assert_eq!(
                parse_indices(bad).unwrap_err().kind(),
                ErrorKind::InvalidArgument
            );
        }
    }

    #[test]
    fn echo_flag_is_kept() {
        let a = args(&["x.csv", "0", "1", "whatever", "--echocommands"]);
        assert!(a.echo_commands);
        assert_eq!(a.output, "whatever");
    }
}
