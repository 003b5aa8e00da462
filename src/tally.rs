//! Insertion-ordered category counters.
//!
//! A [`Tally`] remembers the order in which categories were first seen, so a
//! descending sort by count can break ties by first appearance. Pareto views
//! and top-N selections depend on that tie rule being stable across runs.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `key`.
    pub fn add(&mut self, key: &str) {
        self.add_n(key, 1);
    }

    pub fn add_n(&mut self, key: &str, n: u64) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += n,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
            }
        }
    }

    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Entries in first-seen order.
    pub fn in_order(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), *n))
    }

    /// Entries sorted by descending count, ties in first-seen order.
    pub fn descending(&self) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        // sort_by is stable, so equal counts keep insertion order
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// The `n` largest entries.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.descending();
        sorted.truncate(n);
        sorted
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Pass/fail counts for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassFail {
    pub pass: u64,
    pub fail: u64,
}

impl PassFail {
    pub fn record(&mut self, failed: bool) {
        if failed {
            self.fail += 1;
        } else {
            self.pass += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.pass + self.fail
    }

    pub fn rft_rate(&self) -> f64 {
        crate::core::metrics::percentage(self.pass, self.total())
    }
}

/// Insertion-ordered pass/fail counters keyed by category.
#[derive(Debug, Clone, Default)]
pub struct PassFailTally {
    entries: Vec<(String, PassFail)>,
    index: HashMap<String, usize>,
}

impl PassFailTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str, failed: bool) {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), PassFail::default()));
                self.entries.len() - 1
            }
        };
        self.entries[i].1.record(failed);
    }

    pub fn in_order(&self) -> impl Iterator<Item = (&str, PassFail)> {
        self.entries.iter().map(|(k, pf)| (k.as_str(), *pf))
    }

    pub fn totals(&self) -> PassFail {
        self.entries.iter().fold(PassFail::default(), |acc, (_, pf)| PassFail {
            pass: acc.pass + pf.pass,
            fail: acc.fail + pf.fail,
        })
    }
}
