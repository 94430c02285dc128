use chrono::prelude::*;
use tracing_subscriber::EnvFilter;
pub mod canvas;
pub mod driver;
pub mod error;
pub mod grid;
pub mod linspace;
pub mod pdf;
pub mod plot;
pub mod series;
pub mod style;
pub mod surfaceplot;
pub mod table;

pub use error::{ErrorKind, PlotError, Result};

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// datetime format recognised in the x column
pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logs to stderr; RUST_LOG overrides the default level.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// min and max of the slice, NAN values are skipped
pub fn min_and_max(s: &[f64]) -> Option<(f64, f64)> {
    let mut self_iter = s.iter().filter(|v| !v.is_nan());
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

/// formats UTC epoch seconds, empty if out of the representable range
pub fn format_timestamp(secs: f64, fmt: &str) -> String {
    match Utc.timestamp_opt(secs as i64, 0).single() {
        Some(dt) => dt.format(fmt).to_string(),
        None => String::new(),
    }
}
