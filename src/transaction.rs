//! A single ledger transaction and its on-disk line format.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Separates the fields of a journal line.
pub const FIELD_SEPARATOR: char = '|';

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

const FIELD_COUNT: usize = 5;
/// Minimum number of decimal places written for an amount.
const STORED_SCALE: u32 = 2;

const DATE_WIDTH: usize = 12;
const TIME_WIDTH: usize = 10;
const TEXT_WIDTH: usize = 20;
const AMOUNT_WIDTH: usize = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected 5 fields, got {0}")]
    FieldCount(usize),
    #[error("bad date {0:?}, want yyyy-MM-dd")]
    BadDate(String),
    #[error("bad time {0:?}, want HH:mm:ss")]
    BadTime(String),
    #[error("bad amount {0:?}")]
    BadAmount(String),
}

/// One monetary event. A positive `amount` is a deposit, a negative one a
/// payment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub vendor: String,
    pub amount: Decimal,
}

impl Transaction {
    pub fn new<D, V>(
        date: NaiveDate,
        time: NaiveTime,
        description: D,
        vendor: V,
        amount: Decimal,
    ) -> Self
    where
        D: Into<String>,
        V: Into<String>,
    {
        Transaction {
            date,
            // Only whole seconds are stored.
            time: time.with_nanosecond(0).unwrap_or(time),
            description: description.into(),
            vendor: vendor.into(),
            amount,
        }
    }

    /// Parses the fields of a journal line, in storage order.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() != FIELD_COUNT {
            return Err(ParseError::FieldCount(fields.len()));
        }

        lazy_static! {
            static ref DATE_RX: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
        }
        lazy_static! {
            static ref TIME_RX: Regex = Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$").unwrap();
        }
        lazy_static! {
            static ref AMOUNT_RX: Regex =
                Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").unwrap();
        }

        // chrono is more lenient than the journal format: it takes unpadded
        // or signed numbers and leap seconds.
        let date = Some(fields[0])
            .filter(|s| DATE_RX.is_match(s))
            .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .ok_or_else(|| ParseError::BadDate(fields[0].to_string()))?;
        let time = Some(fields[1])
            .filter(|s| TIME_RX.is_match(s))
            .and_then(|s| NaiveTime::parse_from_str(s, TIME_FORMAT).ok())
            .filter(|t| t.nanosecond() == 0)
            .ok_or_else(|| ParseError::BadTime(fields[1].to_string()))?;
        let amount = Some(fields[4].trim())
            .filter(|s| AMOUNT_RX.is_match(s))
            .and_then(|s| Decimal::from_str(s).ok())
            .ok_or_else(|| ParseError::BadAmount(fields[4].to_string()))?;

        Ok(Transaction::new(date, time, fields[2], fields[3], amount))
    }

    pub fn is_deposit(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    pub fn is_payment(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Renders the transaction as one journal line, including the trailing
    /// newline.
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }

    /// Renders the transaction as a fixed-width table row (no newline).
    pub fn display_row(&self) -> String {
        let amount = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!(
            "{:<dw$} {:<tw$} {:<xw$.xw$} {:<xw$.xw$} {:>aw$}",
            self.date.format(DATE_FORMAT).to_string(),
            self.time.format(TIME_FORMAT).to_string(),
            self.description,
            self.vendor,
            format!("{:.2}", amount),
            dw = DATE_WIDTH,
            tw = TIME_WIDTH,
            xw = TEXT_WIDTH,
            aw = AMOUNT_WIDTH,
        )
    }
}

/// Header row matching the columns of [`Transaction::display_row`].
pub fn display_header() -> String {
    format!(
        "{:<dw$} {:<tw$} {:<xw$} {:<xw$} {:>aw$}",
        "Date",
        "Time",
        "Description",
        "Vendor",
        "Amount",
        dw = DATE_WIDTH,
        tw = TIME_WIDTH,
        xw = TEXT_WIDTH,
        aw = AMOUNT_WIDTH,
    )
}

/// Formats as the journal line, without the trailing newline.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let mut amount = self.amount;
        if amount.scale() < STORED_SCALE {
            amount.rescale(STORED_SCALE);
        }
        write!(
            f,
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.date.format(DATE_FORMAT),
            self.time.format(TIME_FORMAT),
            self.description,
            self.vendor,
            amount,
            sep = FIELD_SEPARATOR,
        )
    }
}

impl FromStr for Transaction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, ParseError> {
        let s = s.strip_suffix('\n').unwrap_or(s);
        let s = s.strip_suffix('\r').unwrap_or(s);
        Transaction::from_fields(s.split(FIELD_SEPARATOR))
    }
}
