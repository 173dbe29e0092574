//! Aggregates over the visible rows: counts, income and expense totals
//! and the largest expense categories.

use crate::{Category, EntryType, FilteredView, Lenient, MoneyCents};

/// Aggregates over the rows currently visible in the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistic {
    /// Visible rows, including those with a malformed amount.
    pub count: usize,
    /// Sum of every valid amount, whatever its type.
    pub total: MoneyCents,
    pub income: MoneyCents,
    pub expenses: MoneyCents,
    /// `income - expenses`.
    pub balance: MoneyCents,
    /// Sum of the recurring entries.
    pub fixed_total: MoneyCents,
    /// Expense amount per category, largest first.
    pub by_category: Vec<(Category, MoneyCents)>,
    /// Rows left out of the sums because their amount did not parse.
    pub skipped: usize,
}

impl Statistic {
    pub fn from_view(view: &FilteredView) -> Self {
        let mut stat = Statistic::default();
        let mut categories: Vec<(Category, MoneyCents)> = Vec::new();

        for entry in view.iter() {
            stat.count += 1;
            let Some(&amount) = entry.amount.valid() else {
                stat.skipped += 1;
                continue;
            };
            stat.total += amount;
            if entry.fixed {
                stat.fixed_total += amount;
            }
            match entry.entry_type {
                Lenient::Valid(EntryType::Income) => stat.income += amount,
                Lenient::Valid(EntryType::Expense) => {
                    stat.expenses += amount;
                    if let Lenient::Valid(category) = entry.category {
                        match categories.iter_mut().find(|(c, _)| *c == category) {
                            Some((_, sum)) => *sum += amount,
                            None => categories.push((category, amount)),
                        }
                    }
                }
                Lenient::Malformed(_) => {}
            }
        }

        stat.balance = stat.income - stat.expenses;
        categories.sort_by(|(ca, a), (cb, b)| b.cmp(a).then(ca.cmp(cb)));
        stat.by_category = categories;
        stat
    }
}
