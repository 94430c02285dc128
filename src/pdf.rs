//! PDF output. plotters has no PDF backend, so charts are drawn to an SVG
//! string first and converted with svg2pdf.

use crate::error::{PlotError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;
use usvg::{fontdb, PostProcessingSteps, TreeParsing, TreePostProc};

/// Converts a whole SVG document to a single page PDF.
/// Text is turned into outlines with the system fonts.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| PlotError::Render(format!("could not read the drawn svg: {}", e)))?;
    let mut fonts = fontdb::Database::new();
    fonts.load_system_fonts();
    debug!("{} font faces for the pdf text", fonts.len());
    tree.postprocess(PostProcessingSteps::default(), &fonts);
    Ok(svg2pdf::convert_tree(&tree, svg2pdf::Options::default()))
}

pub fn write_pdf(svg: &str, out: &Path) -> Result<()> {
    let pdf = svg_to_pdf(svg)?;
    fs::write(out, pdf).map_err(|source| PlotError::Io {
        path: out.to_path_buf(),
        source,
    })
}
