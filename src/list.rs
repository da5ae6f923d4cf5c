use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::ledger::Ledger;
use crate::storage::Storage;
use crate::table::TableOpts;
use crate::transaction::Transaction;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Selection {
    /// Every transaction.
    #[default]
    All,
    /// Only money in.
    Deposits,
    /// Only money out.
    Payments,
}

#[derive(Debug, Args)]
pub struct Cmd {
    /// Which transactions to list.
    #[arg(value_enum, default_value_t = Selection::All)]
    selection: Selection,
    #[command(flatten)]
    table: TableOpts,
}

impl Cmd {
    pub fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        use Selection::*;
        let (trns, empty_msg): (Vec<&Transaction>, &str) = match self.selection {
            All => (ledger.all().iter().collect(), "No transactions recorded."),
            Deposits => (ledger.deposits(), "No deposits recorded."),
            Payments => (ledger.payments(), "No payments recorded."),
        };
        self.table.print(trns, empty_msg)
    }
}
