//! A single origin-destination row from an aggregate file.

use std::fmt;

use csv::StringRecord;
use serde::Serialize;

use crate::error::ParseError;

/// Number of positional fields a data row must carry.
pub const FIELD_COUNT: usize = 7;

const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "sourceid",
    "dstid",
    "mean_travel_time",
    "standard_deviation_travel_time",
    "geometric_mean_travel_time",
    "geometric_standard_deviation_travel_time",
    "period",
];

/// Travel-time statistics between two zones for one aggregation period.
///
/// The two geometric statistics are carried from the source row but no query
/// reads them. The trailing period column (month, day of week or hour of day)
/// is skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    origin: u32,
    destination: u32,
    mean_travel_time: f64,
    standard_deviation_travel_time: f64,
    geometric_mean_travel_time: f64,
    geometric_standard_deviation_travel_time: f64,
}

impl TripRecord {
    /// Builds a record from the positional fields of one data row.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if fewer than seven fields are
    /// present and [`ParseError::NotNumeric`] if one of the first six is not
    /// a number.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().take(FIELD_COUNT).collect();
        if fields.len() < FIELD_COUNT {
            return Err(ParseError::MissingField {
                position: fields.len() + 1,
                name: FIELD_NAMES[fields.len()],
                found: fields.len(),
            });
        }

        Ok(TripRecord {
            origin: parse_field(&fields, 0)?,
            destination: parse_field(&fields, 1)?,
            mean_travel_time: parse_field(&fields, 2)?,
            standard_deviation_travel_time: parse_field(&fields, 3)?,
            geometric_mean_travel_time: parse_field(&fields, 4)?,
            geometric_standard_deviation_travel_time: parse_field(&fields, 5)?,
        })
    }

    pub fn origin(&self) -> u32 {
        self.origin
    }

    pub fn destination(&self) -> u32 {
        self.destination
    }

    pub fn mean_travel_time(&self) -> f64 {
        self.mean_travel_time
    }

    pub fn standard_deviation_travel_time(&self) -> f64 {
        self.standard_deviation_travel_time
    }

    pub fn geometric_mean_travel_time(&self) -> f64 {
        self.geometric_mean_travel_time
    }

    pub fn geometric_standard_deviation_travel_time(&self) -> f64 {
        self.geometric_standard_deviation_travel_time
    }
}

impl TryFrom<&StringRecord> for TripRecord {
    type Error = ParseError;

    fn try_from(row: &StringRecord) -> Result<Self, Self::Error> {
        TripRecord::from_fields(row.iter())
    }
}

impl fmt::Display for TripRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}->{} ({:.2}±{:.2})",
            self.origin, self.destination, self.mean_travel_time, self.standard_deviation_travel_time
        )
    }
}

fn parse_field<N: std::str::FromStr>(fields: &[&str], position: usize) -> Result<N, ParseError> {
    let raw = fields[position].trim();
    raw.parse().map_err(|_| ParseError::NotNumeric {
        name: FIELD_NAMES[position],
        value: raw.to_string(),
    })
}
