use crate::error::{PlotError, Result};
use crate::table::Column;
use crate::DT_FORMAT;
use chrono::prelude::*;
use tracing::debug;

/// How the x values of a series are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    Numeric,
    /// x values are datetimes, stored as UTC epoch seconds
    DateTime,
}

/// One named (x, y) pair of columns, still as strings
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub x_label: String,
    pub x: Vec<String>,
    pub y: Vec<String>,
    /// name of the csv the series comes from, set when several files share a chart
    pub source: Option<String>,
}

impl Series {
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Series {
        self.source = Some(source.into());
        self
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    pub fn legend(&self) -> String {
        match &self.source {
            Some(s) => format!("{}: {}", s, self.label),
            None => self.label.clone(),
        }
    }

    /// Parses both columns to numbers; empty cells become NAN.
    pub fn points(&self) -> Result<(AxisKind, Vec<(f64, f64)>)> {
        let (kind, xs) = parse_x(&self.x_label, &self.x)?;
        let ys = parse_y(&self.label, &self.y)?;
        Ok((kind, xs.into_iter().zip(ys).collect()))
    }
}

/// Builds one series per y index, pairing it with the x column.
/// All the indices are checked before anything is built.
pub fn select(columns: &[Column], x_index: usize, y_indices: &[usize]) -> Result<Vec<Series>> {
    for &index in std::iter::once(&x_index).chain(y_indices) {
        if index >= columns.len() {
            return Err(PlotError::ColumnOutOfRange {
                index,
                columns: columns.len(),
            });
        }
    }
    let xcol = &columns[x_index];
    let series: Vec<Series> = y_indices
        .iter()
        .map(|&yi| {
            let ycol = &columns[yi];
            Series {
                label: ycol.header().to_string(),
                x_label: xcol.header().to_string(),
                x: xcol.values().to_vec(),
                y: ycol.values().to_vec(),
                source: None,
            }
        })
        .collect();
    debug!(
        "selected {} series against column {} ({:?})",
        series.len(),
        x_index,
        xcol.header()
    );
    Ok(series)
}

fn parse_number(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    // inf has no place on an axis
    cell.parse::<f64>().ok().filter(|v| !v.is_infinite())
}

fn parse_datetime(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    NaiveDateTime::parse_from_str(cell, DT_FORMAT)
        .ok()
        .map(|dt| TimeZone::from_utc_datetime(&Utc, &dt).timestamp() as f64)
}

fn non_numeric(label: &str, i: usize, value: &str) -> PlotError {
    PlotError::NonNumeric {
        label: label.to_string(),
        row: i + 1,
        value: value.to_string(),
    }
}

/// Parses the x values as numbers, or as datetimes when the first
/// non-empty value is not a number.
pub fn parse_x(label: &str, values: &[String]) -> Result<(AxisKind, Vec<f64>)> {
    let first = values.iter().find(|v| !v.trim().is_empty());
    let kind = match first {
        Some(v) if parse_number(v).is_none() && parse_datetime(v).is_some() => AxisKind::DateTime,
        _ => AxisKind::Numeric,
    };
    let parse: fn(&str) -> Option<f64> = match kind {
        AxisKind::Numeric => parse_number,
        AxisKind::DateTime => parse_datetime,
    };
    let xs = values
        .iter()
        .enumerate()
        .map(|(i, v)| parse(v).ok_or_else(|| non_numeric(label, i, v)))
        .collect::<Result<Vec<f64>>>()?;
    Ok((kind, xs))
}

pub fn parse_y(label: &str, values: &[String]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| parse_number(v).ok_or_else(|| non_numeric(label, i, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::table::{extract, Table};

    fn columns(rows: &[&[&str]]) -> Vec<Column> {
        let t = Table::new(
            rows.iter()
                .map(|r| r.iter().map(|f| f.to_string()).collect())
                .collect(),
        );
        extract(&t).unwrap()
    }

    fn sample() -> Vec<Column> {
        columns(&[&["t", "a", "b"], &["1", "10", "20"], &["2", "15", "25"]])
    }

    #[test]
    fn select_single_y() {
        let s = select(&sample(), 0, &[1]).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].label, "a");
        assert_eq!(s[0].x_label, "t");
        assert_eq!(s[0].x, vec!["1", "2"]);
        assert_eq!(s[0].y, vec!["10", "15"]);
        assert_eq!(s[0].source, None);
    }

    #[test]
    fn select_one_series_per_y_with_matching_lengths() {
        let cols = sample();
        let s = select(&cols, 1, &[2, 0, 2]).unwrap();
        assert_eq!(s.len(), 3);
        let labels: Vec<&str> = s.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "t", "b"]);
        for series in &s {
            assert_eq!(series.x.len(), 2);
            assert_eq!(series.y.len(), 2);
        }
    }

    #[test]
    fn select_out_of_range() {
        let cols = sample();
        for (x, ys) in &[(0usize, vec![3usize]), (3, vec![1]), (0, vec![1, 7])] {
            let err = select(&cols, *x, ys).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
        }
        assert_eq!(
            select(&[], 0, &[0]).unwrap_err().kind(),
            ErrorKind::IndexOutOfRange
        );
    }

    #[test]
    fn points_parse_numbers_and_gaps() {
        let cols = columns(&[&["t", "a"], &["0.5", " 1e3 "], &["1", ""], &["2", "-3"]]);
        let s = &select(&cols, 0, &[1]).unwrap()[0];
        let (kind, pts) = s.points().unwrap();
        assert_eq!(kind, AxisKind::Numeric);
        assert_eq!(pts[0], (0.5, 1000.));
        assert!(pts[1].1.is_nan());
        assert_eq!(pts[2], (2., -3.));
    }

    #[test]
    fn points_parse_datetime_axis() {
        let cols = columns(&[
            &["datetime", "load"],
            &["2021-03-01 00:00:00", "1"],
            &["2021-03-01 00:02:00", "2"],
        ]);
        let s = &select(&cols, 0, &[1]).unwrap()[0];
        let (kind, pts) = s.points().unwrap();
        assert_eq!(kind, AxisKind::DateTime);
        assert_eq!(pts[1].0 - pts[0].0, 120.);
    }

    #[test]
    fn points_reject_text() {
        let cols = columns(&[&["t", "a"], &["1", "10"], &["2", "oops"]]);
        let s = &select(&cols, 0, &[1]).unwrap()[0];
        match s.points().unwrap_err() {
            PlotError::NonNumeric { label, row, value } => {
                assert_eq!(label, "a");
                assert_eq!(row, 2);
                assert_eq!(value, "oops");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn points_reject_infinite_values() {
        for bad in &["inf", "-inf", "1e400"] {
            let cols = columns(&[&["t", "a"], &["1", "10"], &[*bad, "11"]]);
            let s = &select(&cols, 0, &[1]).unwrap()[0];
            match s.points().unwrap_err() {
                PlotError::NonNumeric { label, row, .. } => assert_eq!((label.as_str(), row), ("t", 2)),
                e => panic!("unexpected error {:?}", e),
            }
        }
    }

    #[test]
    fn legend_includes_source() {
        let s = select(&sample(), 0, &[1]).unwrap().remove(0);
        assert_eq!(s.legend(), "a");
        assert_eq!(s.with_source("run1.csv").legend(), "run1.csv: a");
    }
}
