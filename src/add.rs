use std::fmt;
use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use rust_decimal::Decimal;

use crate::ledger::{AddError, Entry, Ledger};
use crate::storage::Storage;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Deposit,
    Payment,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        use Kind::*;
        f.write_str(match self {
            Deposit => "deposit",
            Payment => "payment",
        })
    }
}

#[derive(Debug, Args)]
pub struct Cmd {
    /// Date of the transaction (yyyy-MM-dd). Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Time of the transaction (HH:mm:ss). Defaults to now.
    #[arg(long)]
    time: Option<NaiveTime>,
    /// What the money was for.
    #[arg(short, long)]
    description: String,
    /// Who the money came from or went to.
    #[arg(short, long)]
    vendor: String,
    /// The amount, as a positive number. Payments are recorded as negative
    /// amounts.
    #[arg(short, long, allow_hyphen_values = true)]
    amount: Decimal,
}

impl Cmd {
    fn entry(&self) -> Entry {
        let now = Local::now().naive_local();
        Entry {
            date: self.date.unwrap_or_else(|| now.date()),
            time: self.time.unwrap_or_else(|| now.time()),
            description: self.description.clone(),
            vendor: self.vendor.clone(),
            amount: self.amount,
        }
    }

    pub fn run<S: Storage>(&self, kind: Kind, ledger: &mut Ledger<S>) -> Result<()> {
        self.add_to(kind, ledger, &mut io::stdout().lock())
    }

    /// Adds the entry and reports it on `out`. A journal write failure only
    /// warns: the transaction is still in the ledger for this run.
    fn add_to<S: Storage, W: Write>(
        &self,
        kind: Kind,
        ledger: &mut Ledger<S>,
        out: &mut W,
    ) -> Result<()> {
        let entry = self.entry();
        let result = match kind {
            Kind::Deposit => ledger.add_deposit(entry),
            Kind::Payment => ledger.add_payment(entry),
        };
        let unsaved = match result {
            Ok(_) => None,
            Err(AddError::NotPersisted(e)) => Some(e),
            Err(e) => return Err(e).with_context(|| format!("adding {}", kind)),
        };

        let added = ledger
            .all()
            .last()
            .with_context(|| format!("{} missing from ledger after adding", kind))?;
        writeln!(out, "Added {}: {}", kind, added.display_row())?;
        if let Some(e) = unsaved {
            tracing::warn!("{} was not saved to the journal: {}", kind, e);
        }
        Ok(())
    }
}
