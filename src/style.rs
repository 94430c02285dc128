use crate::series::Series;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dashed,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    None,
    Circle,
    Triangle,
    Square,
    Cross,
}

/// Colour and line/marker style of one series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleToken {
    pub rgb: (u8, u8, u8),
    pub stroke: Stroke,
    pub marker: Marker,
}

const fn token(rgb: (u8, u8, u8), stroke: Stroke, marker: Marker) -> StyleToken {
    StyleToken {
        rgb,
        stroke,
        marker,
    }
}

const BLUE: (u8, u8, u8) = (0, 0, 255);
const RED: (u8, u8, u8) = (255, 0, 0);
const GREEN: (u8, u8, u8) = (0, 128, 0);
const CYAN: (u8, u8, u8) = (0, 191, 191);
const MAGENTA: (u8, u8, u8) = (191, 0, 191);
const OLIVE: (u8, u8, u8) = (191, 191, 0);
const BLACK: (u8, u8, u8) = (0, 0, 0);

pub const PALETTE: [StyleToken; 12] = [
    token(BLUE, Stroke::Solid, Marker::Square),
    token(RED, Stroke::Dashed, Marker::None),
    token(GREEN, Stroke::None, Marker::Triangle),
    token(CYAN, Stroke::Dashed, Marker::None),
    token(MAGENTA, Stroke::Dashed, Marker::None),
    token(OLIVE, Stroke::Dashed, Marker::None),
    token(BLACK, Stroke::Dashed, Marker::None),
    token(BLUE, Stroke::None, Marker::Triangle),
    token(RED, Stroke::None, Marker::Triangle),
    token(CYAN, Stroke::None, Marker::Triangle),
    token(MAGENTA, Stroke::Solid, Marker::Circle),
    token(BLACK, Stroke::Solid, Marker::Cross),
];

pub fn style_for(ordinal: usize, seed: usize) -> StyleToken {
    PALETTE[ordinal.wrapping_add(seed) % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledSeries {
    pub series: Series,
    pub style: StyleToken,
}

/// Everything the renderer needs to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<StyledSeries>,
}

impl RenderJob {
    pub fn with_axis_labels<S: Into<String>>(mut self, x_label: S, y_label: S) -> RenderJob {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn styles(&self) -> Vec<StyleToken> {
        self.series.iter().map(|s| s.style).collect()
    }
}

/// Styles the series in order from the palette, shifted by `seed`;
/// axis labels come from the first series.
pub fn assemble<T: Into<String>>(series: Vec<Series>, seed: usize, title: T) -> RenderJob {
    let (x_label, y_label) = series
        .first()
        .map(|s| (s.x_label.clone(), s.label.clone()))
        .unwrap_or_default();
    let series: Vec<StyledSeries> = series
        .into_iter()
        .enumerate()
        .map(|(i, s)| StyledSeries {
            series: s,
            style: style_for(i, seed),
        })
        .collect();
    let title = title.into();
    debug!("assembled {} series for {:?}", series.len(), title);
    RenderJob {
        title,
        x_label,
        y_label,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(label: &str) -> Series {
        Series {
            label: label.to_string(),
            x_label: "t".to_string(),
            x: vec!["1".to_string()],
            y: vec!["2".to_string()],
            source: None,
        }
    }

    #[test]
    fn styles_are_deterministic() {
        let input = vec![series("a"), series("b"), series("c")];
        let first = assemble(input.clone(), 3, "f.csv");
        let second = assemble(input, 3, "f.csv");
        assert_eq!(first.styles(), second.styles());
        assert_eq!(first, second);
    }

    #[test]
    fn seed_shifts_the_palette() {
        let job = assemble(vec![series("a"), series("b")], 1, "f.csv");
        assert_eq!(job.styles(), vec![PALETTE[1], PALETTE[2]]);
        assert_eq!(style_for(PALETTE.len() - 1, 1), PALETTE[0]);
    }

    #[test]
    fn neighbours_differ() {
        for i in 0..PALETTE.len() {
            assert_ne!(style_for(i, 0), style_for(i + 1, 0));
        }
    }

    #[test]
    fn labels_from_first_series() {
        let job = assemble(vec![series("a"), series("b")], 0, "f.csv");
        assert_eq!(job.title, "f.csv");
        assert_eq!(job.x_label, "t");
        assert_eq!(job.y_label, "a");
        let job = job.with_axis_labels("time", "load");
        assert_eq!((job.x_label.as_str(), job.y_label.as_str()), ("time", "load"));
    }

    #[test]
    fn empty_job() {
        let job = assemble(Vec::new(), 0, "none");
        assert!(job.is_empty());
        assert_eq!(job.x_label, "");
    }
}
