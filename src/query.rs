use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::transaction::Transaction;

/// Selects transactions by the sign of their amount.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sign {
    /// `amount > 0`.
    Deposit,
    /// `amount < 0`.
    Payment,
}

impl Sign {
    pub fn is_match(self, trn: &Transaction) -> bool {
        use Sign::*;
        match self {
            Deposit => trn.is_deposit(),
            Payment => trn.is_payment(),
        }
    }
}

/// Inclusive range of dates. A missing bound does not constrain the range.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }
}

/// Case-insensitive string matching.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TextMatch {
    /// The whole value equals the needle.
    Eq(String),
    /// The value contains the needle anywhere.
    Contains(String),
}

impl TextMatch {
    pub fn eq_ignore_case(needle: &str) -> Self {
        TextMatch::Eq(needle.to_lowercase())
    }

    pub fn contains_ignore_case(needle: &str) -> Self {
        TextMatch::Contains(needle.to_lowercase())
    }

    pub fn matches_string(&self, s: &str) -> bool {
        use TextMatch::*;

        let s = s.to_lowercase();
        match self {
            Eq(want) => *want == s,
            Contains(want) => s.contains(want.as_str()),
        }
    }
}

/// Custom search criteria. Every predicate that is set must hold for a
/// transaction to match; an empty `Criteria` matches everything.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    pub dates: DateRange,
    pub description: Option<TextMatch>,
    pub vendor: Option<TextMatch>,
    pub amount: Option<Decimal>,
}

impl Criteria {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.dates.start = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.dates.end = Some(date);
        self
    }

    /// Empty text does not constrain the search.
    pub fn description_contains(mut self, text: &str) -> Self {
        self.description = non_empty(text).map(TextMatch::contains_ignore_case);
        self
    }

    /// Empty text does not constrain the search.
    pub fn vendor_contains(mut self, text: &str) -> Self {
        self.vendor = non_empty(text).map(TextMatch::contains_ignore_case);
        self
    }

    pub fn exact_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn is_match(&self, trn: &Transaction) -> bool {
        self.dates.contains(trn.date)
            && self
                .description
                .as_ref()
                .map_or(true, |m| m.matches_string(&trn.description))
            && self
                .vendor
                .as_ref()
                .map_or(true, |m| m.matches_string(&trn.vendor))
            && self.amount.map_or(true, |want| trn.amount == want)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
