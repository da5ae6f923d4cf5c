//! The in-memory ledger and its persistence.

use std::io;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::query::{Criteria, DateRange, Sign, TextMatch};
use crate::storage::Storage;
use crate::transaction::{Transaction, FIELD_SEPARATOR};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading journal: {0}")]
    Io(#[from] io::Error),
}

/// Rejected input to [`Ledger::add_deposit`] or [`Ledger::add_payment`]. The
/// ledger is unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("{field} must not contain '|' or line breaks")]
    ReservedCharacter { field: &'static str },
}

#[derive(Debug, Error)]
pub enum AddError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The transaction was added to the ledger in memory, but could not be
    /// written to storage. It is lost when the process exits.
    #[error("transaction recorded for this session only, writing journal failed: {0}")]
    NotPersisted(#[source] io::Error),
}

/// Outcome of [`Ledger::load`].
#[derive(Debug, Default, Eq, PartialEq)]
pub struct LoadSummary {
    /// Transactions read into the ledger.
    pub loaded: usize,
    /// Non-blank lines that could not be parsed and were left out.
    pub skipped: usize,
    /// True when nothing had been persisted yet.
    pub missing_source: bool,
}

/// User-entered details of a deposit or payment. `amount` is the positive
/// magnitude; the sign is decided by which `add_*` method receives it.
#[derive(Clone, Debug)]
pub struct Entry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub vendor: String,
    pub amount: Decimal,
}

impl Entry {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }

    fn into_transaction(self, amount: Decimal) -> Transaction {
        Transaction::new(self.date, self.time, self.description, self.vendor, amount)
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains(|c: char| c == FIELD_SEPARATOR || c == '\n' || c == '\r') {
        Err(ValidationError::ReservedCharacter { field })
    } else {
        Ok(())
    }
}

/// Transactions in the order they were recorded, backed by append-only
/// storage.
pub struct Ledger<S> {
    storage: S,
    transactions: Vec<Transaction>,
}

impl<S: Storage> Ledger<S> {
    /// Reads every persisted transaction from `storage`. Blank lines are
    /// ignored and malformed lines are skipped, so a damaged journal still
    /// loads whatever can be read.
    pub fn load(storage: S) -> Result<(Self, LoadSummary), LoadError> {
        let mut summary = LoadSummary::default();
        let mut transactions = Vec::new();

        match storage.reader()? {
            None => summary.missing_source = true,
            Some(reader) => {
                let mut csv_rdr = csv::ReaderBuilder::new()
                    .delimiter(FIELD_SEPARATOR as u8)
                    .has_headers(false)
                    .flexible(true)
                    .quoting(false)
                    .from_reader(reader);

                for result in csv_rdr.records() {
                    let record = match result {
                        Ok(record) => record,
                        Err(e) if e.is_io_error() => return Err(io::Error::from(e).into()),
                        Err(e) => {
                            tracing::warn!("skipping unreadable journal line: {}", e);
                            summary.skipped += 1;
                            continue;
                        }
                    };
                    let line = record.position().map_or(0, |pos| pos.line());
                    if record.len() == 1 && record[0].trim().is_empty() {
                        continue;
                    }
                    match Transaction::from_fields(record.iter()) {
                        Ok(trn) => transactions.push(trn),
                        Err(e) => {
                            tracing::warn!("skipping journal line {}: {}", line, e);
                            summary.skipped += 1;
                        }
                    }
                }
            }
        }

        summary.loaded = transactions.len();
        tracing::info!(
            "loaded {} transactions, skipped {} lines",
            summary.loaded,
            summary.skipped
        );

        Ok((
            Ledger {
                storage,
                transactions,
            },
            summary,
        ))
    }

    /// Records a deposit of `entry.amount`.
    pub fn add_deposit(&mut self, entry: Entry) -> Result<&Transaction, AddError> {
        entry.validate()?;
        let amount = entry.amount;
        self.add(entry.into_transaction(amount))
    }

    /// Records a payment of `entry.amount`, stored as a negative amount.
    pub fn add_payment(&mut self, entry: Entry) -> Result<&Transaction, AddError> {
        entry.validate()?;
        let amount = -entry.amount;
        self.add(entry.into_transaction(amount))
    }

    /// Appends `trn` to the ledger and then to storage. On
    /// [`AddError::NotPersisted`] the transaction stays in the ledger.
    pub fn add(&mut self, trn: Transaction) -> Result<&Transaction, AddError> {
        check_text("description", &trn.description)?;
        check_text("vendor", &trn.vendor)?;

        let line = trn.to_line();
        self.transactions.push(trn);
        if let Err(e) = self.storage.append(&line) {
            tracing::debug!("failed to append to journal: {}", e);
            return Err(AddError::NotPersisted(e));
        }
        tracing::debug!("appended {:?}", line.trim_end());
        Ok(&self.transactions[self.transactions.len() - 1])
    }

    /// Every transaction, in the order recorded.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn filter_by_sign(&self, sign: Sign) -> Vec<&Transaction> {
        self.select(|trn| sign.is_match(trn))
    }

    pub fn deposits(&self) -> Vec<&Transaction> {
        self.filter_by_sign(Sign::Deposit)
    }

    pub fn payments(&self) -> Vec<&Transaction> {
        self.filter_by_sign(Sign::Payment)
    }

    pub fn filter_by_date_range(&self, range: DateRange) -> Vec<&Transaction> {
        self.select(|trn| range.contains(trn.date))
    }

    /// Transactions whose vendor equals `name`, ignoring case. Unlike
    /// [`Criteria::vendor_contains`] this does not match substrings.
    pub fn filter_by_vendor(&self, name: &str) -> Vec<&Transaction> {
        let m = TextMatch::eq_ignore_case(name);
        self.select(|trn| m.matches_string(&trn.vendor))
    }

    pub fn custom_filter(&self, criteria: &Criteria) -> Vec<&Transaction> {
        self.select(|trn| criteria.is_match(trn))
    }

    fn select<F>(&self, pred: F) -> Vec<&Transaction>
    where
        F: Fn(&Transaction) -> bool,
    {
        self.transactions.iter().filter(|trn| pred(trn)).collect()
    }
}
