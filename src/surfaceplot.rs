use super::VERSION;
use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceArgs {
    pub filepath: PathBuf,
    pub output: PathBuf,
    pub echo_commands: bool,
    pub display: bool,
    pub verbose: bool,
}

pub fn cli_app<'a, 'b>() -> App<'a, 'b> {
    let arg_csvin = Arg::with_name("filepath")
        .help("2D csv grid; first row and first column hold the axis legends")
        .required(true)
        .index(1);
    let arg_out = Arg::with_name("output")
        .help("name of the output .svg, .pdf or .png file")
        .short("o")
        .long("output")
        .takes_value(true);
    let arg_echo = Arg::with_name("echocommands")
        .help("print the received arguments and exit without plotting")
        .long("echocommands");
    let arg_nodisplay = Arg::with_name("nodisplay")
        .help("only write the output file, do not open it")
        .long("nodisplay");
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose");
    App::new("surfaceplot")
        .version(VERSION.unwrap_or("unknown"))
        .author("James Kent")
        .about("cli app to plot a 2D csv grid as a 3D surface")
        .arg(arg_csvin)
        .arg(arg_out)
        .arg(arg_echo)
        .arg(arg_nodisplay)
        .arg(arg_verbose)
}

/// Takes the CLI arguments of the surface plot.
pub fn parse_cli() -> SurfaceArgs {
    SurfaceArgs::from_matches(&cli_app().get_matches())
}

impl SurfaceArgs {
    pub fn from_matches(m: &ArgMatches) -> SurfaceArgs {
        let filepath = PathBuf::from(m.value_of("filepath").unwrap_or_default());
        let output = match m.value_of("output") {
            Some(p) => PathBuf::from(p),
            None => {
                let mut svgout = filepath.clone();
                svgout.set_extension("svg");
                svgout
            }
        };
        SurfaceArgs {
            filepath,
            output,
            echo_commands: m.is_present("echocommands"),
            display: !m.is_present("nodisplay"),
            verbose: m.is_present("verbose"),
        }
    }
}
