//! Landsat product identifiers.
//!
//! A Collection-1 product identifier packs sensor, correction level,
//! WRS-2 path/row, acquisition and processing dates, collection
//! number and tier into seven underscore-separated fields, e.g.
//! `LC08_L1GT_044034_20130330_20170310_01_T2`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{LandsatError, LandsatResult};

/// Sensor identifiers present in the catalog.
pub const SENSORS: [&str; 9] = [
    "LC08", "LE07", "LT05", "LT04", "LM05", "LM04", "LM03", "LM02", "LM01",
];

/// Collection tiers.
pub const TIERS: [&str; 3] = ["T1", "T2", "RT"];

/// Structured form of a Landsat product identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductId {
    pub sensor: String,
    pub correction: String,
    pub path: u16,
    pub row: u16,
    pub acquisition_date: NaiveDate,
    pub processing_date: NaiveDate,
    pub collection: u8,
    pub tier: String,
}

impl FromStr for ProductId {
    type Err = LandsatError;

    fn from_str(s: &str) -> LandsatResult<Self> {
        let invalid = |msg: &str| LandsatError::InvalidProductId(format!("{}: {}", s, msg));

        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 7 {
            return Err(invalid(&format!("expected 7 fields, got {}", parts.len())));
        }

        let pathrow = parts[2];
        if pathrow.len() != 6 || !pathrow.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("path/row field must be 6 digits"));
        }
        let path: u16 = pathrow[..3]
            .parse()
            .map_err(|_| invalid("unparsable path"))?;
        let row: u16 = pathrow[3..]
            .parse()
            .map_err(|_| invalid("unparsable row"))?;

        let acquisition_date = NaiveDate::parse_from_str(parts[3], "%Y%m%d")
            .map_err(|_| invalid("invalid acquisition date"))?;
        let processing_date = NaiveDate::parse_from_str(parts[4], "%Y%m%d")
            .map_err(|_| invalid("invalid processing date"))?;

        if parts[5].len() != 2 {
            return Err(invalid("collection field must be 2 digits"));
        }
        let collection: u8 = parts[5]
            .parse()
            .map_err(|_| invalid("unparsable collection number"))?;

        Ok(ProductId {
            sensor: parts[0].to_string(),
            correction: parts[1].to_string(),
            path,
            row,
            acquisition_date,
            processing_date,
            collection,
            tier: parts[6].to_string(),
        })
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{:03}{:03}_{}_{}_{:02}_{}",
            self.sensor,
            self.correction,
            self.path,
            self.row,
            self.acquisition_date.format("%Y%m%d"),
            self.processing_date.format("%Y%m%d"),
            self.collection,
            self.tier,
        )
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> LandsatResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| LandsatError::InvalidDate(s.to_string()))
}
