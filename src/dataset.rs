//! Dataset ingestion: a header line followed by a fixed-width numeric
//! table, with one optional name token per row.
//!
//! The format is `N D K max_iterations has_names` on the first line, then
//! `N` rows of `D` whitespace-separated attribute values. Rows may wrap
//! across lines; only token order matters. All validation of malformed
//! input happens here, so the iteration core can assume a well-formed
//! [`PointStore`].

use crate::error::{KMeansError, Result};
use crate::points::PointStore;
use crate::primitive::Primitive;
use num::NumCast;
use std::io::BufRead;

/// Parsed first-line metadata of a dataset stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatasetHeader {
    pub point_cnt: usize,
    pub dims: usize,
    pub k: usize,
    pub max_iterations: usize,
    pub has_names: bool,
}

/// A fully ingested dataset: run parameters plus the populated store.
#[derive(Clone, Debug)]
pub struct Dataset<T: Primitive> {
    pub header: DatasetHeader,
    pub points: PointStore<T>,
}

/// Read a complete dataset from `reader`.
pub fn read_dataset<T: Primitive, R: BufRead>(mut reader: R) -> Result<Dataset<T>> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    // Strip a UTF-8 byte-order mark if the file carries one.
    let contents = contents.trim_start_matches('\u{feff}');

    let (first_line, rest) = contents
        .split_once('\n')
        .ok_or_else(|| KMeansError::Dataset("missing data rows after the header".into()))?;
    let header = parse_header(first_line)?;

    let mut tokens = rest.split_whitespace();
    let mut points = PointStore::with_dims(header.dims);
    let mut names = header.has_names.then(Vec::new);
    let mut row = vec![T::zero(); header.dims];
    for i in 0..header.point_cnt {
        for (j, slot) in row.iter_mut().enumerate() {
            let token = tokens.next().ok_or_else(|| {
                KMeansError::Dataset(format!(
                    "row {i} ends after {j} of {} attributes",
                    header.dims
                ))
            })?;
            let value: f64 = token.parse().map_err(|_| {
                KMeansError::Dataset(format!("row {i}, attribute {j}: not a number: {token:?}"))
            })?;
            *slot = NumCast::from(value).ok_or_else(|| {
                KMeansError::Dataset(format!("row {i}, attribute {j}: {value} is not representable"))
            })?;
        }
        points.push(&row)?;
        if let Some(names) = names.as_mut() {
            let token = tokens
                .next()
                .ok_or_else(|| KMeansError::Dataset(format!("row {i}: missing name token")))?;
            names.push(token.to_string());
        }
    }
    if let Some(names) = names {
        points.set_names(names)?;
    }

    Ok(Dataset { header, points })
}

fn parse_header(line: &str) -> Result<DatasetHeader> {
    let mut fields = line.split_whitespace();
    let mut next_number = |what: &str| -> Result<usize> {
        let token = fields
            .next()
            .ok_or_else(|| KMeansError::Dataset(format!("header is missing {what}")))?;
        token
            .parse()
            .map_err(|_| KMeansError::Dataset(format!("header {what} is not a number: {token:?}")))
    };

    let point_cnt = next_number("the point count")?;
    let dims = next_number("the attribute count")?;
    let k = next_number("the cluster count")?;
    let max_iterations = next_number("the iteration cap")?;
    let has_names = next_number("the name flag")? != 0;

    if point_cnt == 0 || dims == 0 || k == 0 || max_iterations == 0 {
        return Err(KMeansError::Dataset(format!(
            "header fields must be nonzero: {line:?}"
        )));
    }

    Ok(DatasetHeader {
        point_cnt,
        dims,
        k,
        max_iterations,
        has_names,
    })
}
