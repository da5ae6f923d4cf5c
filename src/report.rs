//! Canned reports over calendar periods and vendors.

use anyhow::Result;
use chrono::{Datelike, Duration, Local, NaiveDate};
use clap::{Args, Subcommand};

use crate::ledger::Ledger;
use crate::query::DateRange;
use crate::storage::Storage;
use crate::table::TableOpts;

/// A calendar period ending relative to "today".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Period {
    MonthToDate,
    PreviousMonth,
    YearToDate,
    PreviousYear,
}

impl Period {
    /// The inclusive dates covered by the period, given the current date.
    pub fn range(self, today: NaiveDate) -> DateRange {
        use Period::*;
        match self {
            MonthToDate => DateRange::new(month_start(today), today),
            PreviousMonth => {
                let end = month_start(today) - Duration::days(1);
                DateRange::new(month_start(end), end)
            }
            YearToDate => DateRange::new(year_start(today), today),
            PreviousYear => {
                let end = year_start(today) - Duration::days(1);
                DateRange::new(year_start(end), end)
            }
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0().into())
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.ordinal0().into())
}

#[derive(Debug, Subcommand)]
enum Report {
    /// Transactions from the first of this month until today.
    MonthToDate,
    /// Transactions during the whole of last month.
    PreviousMonth,
    /// Transactions from the first of January until today.
    YearToDate,
    /// Transactions during the whole of last year.
    PreviousYear,
    /// Transactions whose vendor is exactly NAME (ignoring case).
    Vendor { name: String },
}

#[derive(Debug, Args)]
pub struct Cmd {
    #[command(subcommand)]
    report: Report,
    /// The date to treat as today (yyyy-MM-dd). Defaults to the local date.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    #[command(flatten)]
    table: TableOpts,
}

impl Cmd {
    pub fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        use Report::*;
        let period = match &self.report {
            MonthToDate => Period::MonthToDate,
            PreviousMonth => Period::PreviousMonth,
            YearToDate => Period::YearToDate,
            PreviousYear => Period::PreviousYear,
            Vendor { name } => {
                return self.table.print(
                    ledger.filter_by_vendor(name),
                    &format!("No transactions found for vendor {:?}.", name),
                );
            }
        };

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let range = period.range(today);
        tracing::debug!("reporting {:?} as of {}: {:?}", period, today, range);
        self.table.print(
            ledger.filter_by_date_range(range),
            &format!(
                "No transactions found between {} and {}.",
                format_bound(range.start),
                format_bound(range.end)
            ),
        )
    }
}

fn format_bound(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "any date".to_string(), |d| d.to_string())
}
