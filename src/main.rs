use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[cfg(test)]
mod testutil;

mod add;
mod ledger;
mod list;
mod query;
mod report;
mod search;
mod storage;
mod table;
mod transaction;

use ledger::Ledger;
use storage::JournalFile;

#[derive(Debug, Parser)]
/// Records deposits and payments in a plain text journal and reports on them.
struct Command {
    /// The journal file to read from and append to.
    #[arg(
        short = 'j',
        long = "journal",
        env = "TALLY_JOURNAL",
        default_value = "transactions.csv",
        global = true
    )]
    journal: PathBuf,
    /// Log more detail to stderr. Repeat for even more. RUST_LOG overrides
    /// this.
    #[arg(long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    subcmd: SubCommand,
}

#[derive(Debug, Subcommand)]
enum SubCommand {
    /// Records money received.
    Deposit(add::Cmd),
    /// Records money paid out. The amount is given as a positive number.
    Payment(add::Cmd),
    /// Lists all transactions, or only deposits or payments.
    List(list::Cmd),
    /// Reports on a calendar period or a single vendor.
    Report(report::Cmd),
    /// Finds transactions matching every given criterion.
    Search(search::Cmd),
}

fn main() -> Result<()> {
    let cmd = Command::parse();
    init_logging(cmd.verbose);

    let journal = JournalFile::new(&cmd.journal);
    let (mut ledger, summary) =
        Ledger::load(journal).with_context(|| format!("loading {:?}", cmd.journal))?;
    if summary.missing_source {
        tracing::info!(
            "{:?} does not exist yet, it is created by the first deposit or payment",
            cmd.journal
        );
    }
    if summary.skipped > 0 {
        tracing::warn!(
            "{} lines of {:?} could not be read and were left out",
            summary.skipped,
            cmd.journal
        );
    }

    use SubCommand::*;
    match &cmd.subcmd {
        Deposit(c) => c.run(add::Kind::Deposit, &mut ledger),
        Payment(c) => c.run(add::Kind::Payment, &mut ledger),
        List(c) => c.run(&ledger),
        Report(c) => c.run(&ledger),
        Search(c) => c.run(&ledger),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::testutil::{date, dec};

    #[test]
    fn command_definition() {
        Command::command().debug_assert();
    }

    fn parse(args: &[&str]) -> Command {
        Command::try_parse_from(std::iter::once("tally").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn journal_default() {
        let cmd = parse(&["list"]);
        assert_eq!(PathBuf::from("transactions.csv"), cmd.journal);
    }

    #[test]
    fn journal_after_subcommand() {
        let cmd = parse(&["list", "payments", "--journal", "other.csv"]);
        assert_eq!(PathBuf::from("other.csv"), cmd.journal);
    }

    #[test]
    fn search_criteria() {
        let cmd = parse(&[
            "search",
            "--from",
            "2023-04-01",
            "--vendor",
            "amazon",
            "--amount",
            "-89.50",
        ]);
        let criteria = match cmd.subcmd {
            SubCommand::Search(c) => c.criteria(),
            other => panic!("got {:?}, want search", other),
        };
        assert_eq!(Some(date("2023-04-01")), criteria.dates.start);
        assert_eq!(None, criteria.dates.end);
        assert!(criteria.description.is_none());
        assert!(criteria.vendor.is_some());
        assert_eq!(Some(dec("-89.50")), criteria.amount);
    }

    #[test]
    fn payment_requires_amount() {
        let result = Command::try_parse_from([
            "tally",
            "payment",
            "--description",
            "rent",
            "--vendor",
            "Landlord",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn report_requires_kind() {
        assert!(Command::try_parse_from(["tally", "report"]).is_err());
        parse(&["report", "previous-month", "--today", "2023-04-20"]);
        parse(&["report", "vendor", "Amazon", "--order", "file"]);
    }

    #[test]
    fn bad_date_rejected() {
        assert!(Command::try_parse_from(["tally", "search", "--from", "04/01/2023"]).is_err());
    }
}
