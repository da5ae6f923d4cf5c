//! Terminal tables of transactions.

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, ValueEnum};

use crate::transaction::{display_header, Transaction};

/// Order in which to print transactions.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Order {
    /// Most recent date and time first.
    #[default]
    Newest,
    /// The order they were recorded in the journal.
    File,
}

impl Order {
    pub fn apply(self, trns: &mut [&Transaction]) {
        use Order::*;
        match self {
            Newest => {
                // Later entries come first among equal timestamps.
                trns.reverse();
                trns.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
            }
            File => {}
        }
    }
}

/// Options shared by every command that prints transactions.
#[derive(Debug, Args)]
pub struct TableOpts {
    /// Order of the printed transactions.
    #[arg(long, value_enum, default_value_t = Order::Newest, global = true)]
    order: Order,
}

impl TableOpts {
    /// Prints `trns` to stdout, or `empty_msg` when there are none.
    pub fn print(&self, mut trns: Vec<&Transaction>, empty_msg: &str) -> Result<()> {
        self.order.apply(&mut trns);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_table(&mut out, &trns, empty_msg)?;
        out.flush()?;
        Ok(())
    }
}

pub fn write_table<W: Write>(w: &mut W, trns: &[&Transaction], empty_msg: &str) -> io::Result<()> {
    let header = display_header();
    writeln!(w, "{}", header)?;
    writeln!(w, "{}", "-".repeat(header.len()))?;
    for trn in trns {
        writeln!(w, "{}", trn.display_row())?;
    }
    if trns.is_empty() {
        writeln!(w, "{}", empty_msg)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::trn;

    fn descriptions(trns: &[&Transaction]) -> Vec<String> {
        trns.iter().map(|t| t.description.clone()).collect()
    }

    #[test]
    fn order_newest_first() {
        let a = trn("2023-04-15", "10:00:00", "a", "v", "1");
        let b = trn("2023-04-16", "09:00:00", "b", "v", "1");
        let c = trn("2023-04-15", "11:00:00", "c", "v", "1");
        let d = trn("2023-04-16", "09:00:00", "d", "v", "1");

        let mut trns = vec![&a, &b, &c, &d];
        Order::Newest.apply(&mut trns);
        assert_eq!(vec!["d", "b", "c", "a"], descriptions(&trns));

        let mut trns = vec![&a, &b, &c, &d];
        Order::File.apply(&mut trns);
        assert_eq!(vec!["a", "b", "c", "d"], descriptions(&trns));
    }

    #[test]
    fn table_layout() {
        let t = trn("2023-04-15", "10:13:25", "keyboard", "Amazon", "-89.5");
        let mut out = Vec::new();
        write_table(&mut out, &[&t], "nothing").expect("write");
        let out = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(3, lines.len());
        assert!(lines[0].starts_with("Date "));
        assert!(lines[0].ends_with("Amount"));
        assert_eq!(lines[0].len(), lines[1].len());
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(t.display_row(), lines[2]);
    }

    #[test]
    fn table_empty_message() {
        let mut out = Vec::new();
        write_table(&mut out, &[], "No transactions found.").expect("write");
        let out = String::from_utf8(out).expect("utf8");
        assert_eq!(Some("No transactions found."), out.lines().last());
    }
}
