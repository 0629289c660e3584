//! # Fiscal Years and Invoice Numbers
//!
//! Invoices are numbered per company and per fiscal year. A fiscal year
//! runs from April 1 to March 31 and is labelled with two-digit years.
//!
//! ```text
//!   2024-03-31 ──► FY23-24        2024-04-01 ──► FY24-25
//!
//!   ┌────────┬───────────┬──────┐
//!   │  INV   │  FY24-25  │ 0007 │   sequence zero padded to 4 digits,
//!   └────────┴───────────┴──────┘   wider numbers are printed in full
//! ```
//!
//! Allocation of the sequence itself happens in the database, this module
//! only labels and formats.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::{INVOICE_NUMBER_PREFIX, INVOICE_SEQUENCE_WIDTH};

/// First month of the fiscal year.
const FISCAL_YEAR_START_MONTH: u32 = 4;

/// An April–March fiscal year, identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FiscalYear {
    start_year: i32,
}

impl FiscalYear {
    /// The fiscal year starting in April of `start_year`.
    pub const fn starting_in(start_year: i32) -> Self {
        FiscalYear { start_year }
    }

    /// The fiscal year containing `date`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use invo_core::FiscalYear;
    ///
    /// let march = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    /// let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    ///
    /// assert_eq!(FiscalYear::for_date(march).label(), "FY23-24");
    /// assert_eq!(FiscalYear::for_date(april).label(), "FY24-25");
    /// ```
    pub fn for_date(date: NaiveDate) -> Self {
        if date.month() >= FISCAL_YEAR_START_MONTH {
            FiscalYear::starting_in(date.year())
        } else {
            FiscalYear::starting_in(date.year() - 1)
        }
    }

    #[inline]
    pub const fn start_year(&self) -> i32 {
        self.start_year
    }

    /// `FY{yy}-{yy+1}`, both halves two digits.
    pub fn label(&self) -> String {
        format!(
            "FY{:02}-{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }

    /// April 1 of the start year.
    pub fn starts_on(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year, FISCAL_YEAR_START_MONTH, 1)
    }

    /// March 31 of the following year.
    pub fn ends_on(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.start_year + 1, 3, 31)
    }

    /// Formats the invoice number for sequence `sequence` in this year.
    pub fn invoice_number(&self, sequence: i64) -> String {
        format_invoice_number(&self.label(), sequence)
    }
}

impl fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Parses a stored label back into a year.
///
/// Two-digit years are read as 20xx, which is the only century issued.
impl FromStr for FiscalYear {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidFiscalYear(s.to_string());

        let rest = s.strip_prefix("FY").ok_or_else(invalid)?;
        let (start, end) = rest.split_once('-').ok_or_else(invalid)?;
        if start.len() != 2 || end.len() != 2 {
            return Err(invalid());
        }

        let start: i32 = start.parse().map_err(|_| invalid())?;
        let end: i32 = end.parse().map_err(|_| invalid())?;
        if (start + 1) % 100 != end {
            return Err(invalid());
        }

        Ok(FiscalYear::starting_in(2000 + start))
    }
}

/// `INV/{fiscal_year}/{sequence:04}`.
///
/// ## Example
/// ```rust
/// use invo_core::fiscal::format_invoice_number;
///
/// assert_eq!(format_invoice_number("FY24-25", 7), "INV/FY24-25/0007");
/// assert_eq!(format_invoice_number("FY24-25", 12345), "INV/FY24-25/12345");
/// ```
pub fn format_invoice_number(fiscal_year: &str, sequence: i64) -> String {
    format!(
        "{}/{}/{:0width$}",
        INVOICE_NUMBER_PREFIX,
        fiscal_year,
        sequence,
        width = INVOICE_SEQUENCE_WIDTH
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_boundary_dates() {
        assert_eq!(FiscalYear::for_date(date(2024, 3, 31)).label(), "FY23-24");
        assert_eq!(FiscalYear::for_date(date(2024, 4, 1)).label(), "FY24-25");
        assert_eq!(FiscalYear::for_date(date(2025, 1, 15)).label(), "FY24-25");
        assert_eq!(FiscalYear::for_date(date(2024, 12, 31)).label(), "FY24-25");
    }

    #[test]
    fn test_century_wrap() {
        assert_eq!(FiscalYear::for_date(date(2099, 6, 1)).label(), "FY99-00");
        assert_eq!(FiscalYear::for_date(date(2000, 2, 1)).label(), "FY99-00");
        assert_eq!(FiscalYear::for_date(date(2009, 4, 1)).label(), "FY09-10");
    }

    #[test]
    fn test_period_bounds() {
        let fy = FiscalYear::starting_in(2024);
        assert_eq!(fy.starts_on(), Some(date(2024, 4, 1)));
        assert_eq!(fy.ends_on(), Some(date(2025, 3, 31)));
    }

    #[test]
    fn test_parse_label() {
        let fy: FiscalYear = "FY24-25".parse().unwrap();
        assert_eq!(fy, FiscalYear::starting_in(2024));
        assert_eq!(fy.to_string(), "FY24-25");

        let fy: FiscalYear = "FY99-00".parse().unwrap();
        assert_eq!(fy.start_year(), 2099);
    }

    #[test]
    fn test_parse_rejects_bad_labels() {
        for bad in ["", "2024", "FY2024-25", "FY24-26", "FY24_25", "FYab-cd", "fy24-25"] {
            assert!(bad.parse::<FiscalYear>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_invoice_number_padding() {
        let fy = FiscalYear::starting_in(2024);
        assert_eq!(fy.invoice_number(1), "INV/FY24-25/0001");
        assert_eq!(fy.invoice_number(42), "INV/FY24-25/0042");
        assert_eq!(fy.invoice_number(9999), "INV/FY24-25/9999");
        assert_eq!(fy.invoice_number(10000), "INV/FY24-25/10000");
    }
}
