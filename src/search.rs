use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;

use crate::ledger::Ledger;
use crate::query::Criteria;
use crate::storage::Storage;
use crate::table::TableOpts;

/// Searches transactions by any combination of fields. Every given option
/// must match.
#[derive(Debug, Args)]
pub struct Cmd {
    /// Earliest date to include (yyyy-MM-dd).
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Latest date to include (yyyy-MM-dd).
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Text that the description contains, ignoring case.
    #[arg(short, long)]
    description: Option<String>,
    /// Text that the vendor contains, ignoring case.
    #[arg(short, long)]
    vendor: Option<String>,
    /// Exact amount, negative for payments.
    #[arg(short, long, allow_hyphen_values = true)]
    amount: Option<Decimal>,
    #[command(flatten)]
    table: TableOpts,
}

impl Cmd {
    pub fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::new();
        if let Some(from) = self.from {
            criteria = criteria.start_date(from);
        }
        if let Some(to) = self.to {
            criteria = criteria.end_date(to);
        }
        if let Some(text) = &self.description {
            criteria = criteria.description_contains(text);
        }
        if let Some(text) = &self.vendor {
            criteria = criteria.vendor_contains(text);
        }
        if let Some(amount) = self.amount {
            criteria = criteria.exact_amount(amount);
        }
        criteria
    }

    pub fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        let criteria = self.criteria();
        tracing::debug!("searching with {:?}", criteria);
        self.table.print(
            ledger.custom_filter(&criteria),
            "No transactions match the search.",
        )
    }
}
