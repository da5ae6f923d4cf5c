use std::io::{self, Read};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::ledger::Entry;
use crate::storage::Storage;
use crate::transaction::{Transaction, DATE_FORMAT, TIME_FORMAT};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).expect("test date did not parse")
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, TIME_FORMAT).expect("test time did not parse")
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).expect("test amount did not parse")
}

pub fn trn(d: &str, t: &str, description: &str, vendor: &str, amount: &str) -> Transaction {
    Transaction::new(date(d), time(t), description, vendor, dec(amount))
}

pub fn entry(d: &str, t: &str, description: &str, vendor: &str, amount: &str) -> Entry {
    Entry {
        date: date(d),
        time: time(t),
        description: description.to_string(),
        vendor: vendor.to_string(),
        amount: dec(amount),
    }
}

/// In-memory `Storage` for tests.
pub struct MemoryStorage {
    content: Option<Vec<u8>>,
    fail_appends: bool,
}

impl MemoryStorage {
    /// Storage with nothing persisted yet.
    pub fn missing() -> Self {
        MemoryStorage {
            content: None,
            fail_appends: false,
        }
    }

    pub fn with_content(content: &str) -> Self {
        Self::with_bytes(content.as_bytes())
    }

    /// Storage holding raw bytes, which need not be valid UTF-8.
    pub fn with_bytes(content: &[u8]) -> Self {
        MemoryStorage {
            content: Some(content.to_vec()),
            fail_appends: false,
        }
    }

    /// Empty storage that rejects every append.
    pub fn failing() -> Self {
        MemoryStorage {
            content: Some(Vec::new()),
            fail_appends: true,
        }
    }

    pub fn content(&self) -> &str {
        std::str::from_utf8(self.content.as_deref().unwrap_or_default())
            .expect("test storage content is not UTF-8")
    }
}

impl Storage for MemoryStorage {
    fn reader(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .content
            .as_ref()
            .map(|c| Box::new(c.as_slice()) as Box<dyn Read + '_>))
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        if self.fail_appends {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.content
            .get_or_insert_with(Vec::new)
            .extend_from_slice(line.as_bytes());
        Ok(())
    }
}
