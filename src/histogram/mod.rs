//! Word frequency models.
//!
//! A document is described by two [`Histogram`]s: one counting single words
//! and one counting compound words (two consecutive words joined by a single
//! space). The query evaluator only ever borrows them through
//! [`FrequencyModels`].

use ahash::AHashMap;

/// Term to occurrence count mapping. Absent terms count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: AHashMap<String, u64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `term`
    pub fn insert(&mut self, term: &str) {
        self.add(term, 1);
    }

    /// Add `count` occurrences of `term`
    pub fn add(&mut self, term: &str, count: u64) {
        if count == 0 {
            return;
        }
        match self.counts.get_mut(term) {
            Some(existing) => *existing = existing.saturating_add(count),
            None => {
                self.counts.insert(term.to_string(), count);
            }
        }
    }

    /// Occurrence count of `term` (0 when absent)
    #[inline]
    pub fn count(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.count(term) > 0
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Entries with at least `min_count` occurrences, most frequent first.
    /// Ties are ordered by term so the output is stable.
    pub fn sorted_by_count(&self, min_count: u64) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().filter(|&(_, c)| c >= min_count).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut histogram = Histogram::new();
        for (term, count) in iter {
            histogram.add(term.as_ref(), count);
        }
        histogram
    }
}

/// Single and compound word histograms of one document
#[derive(Debug, Clone, Default)]
pub struct HistogramPair {
    pub single: Histogram,
    pub compound: Histogram,
}

impl HistogramPair {
    /// Borrow both histograms for evaluation
    pub fn models(&self) -> FrequencyModels<'_> {
        FrequencyModels::with_compound(&self.single, &self.compound)
    }
}

/// Borrowed view on the frequency models of one document.
///
/// When no compound model is given, compound terms are looked up in the
/// single model.
#[derive(Debug, Clone, Copy)]
pub struct FrequencyModels<'a> {
    single: &'a Histogram,
    compound: Option<&'a Histogram>,
}

impl<'a> FrequencyModels<'a> {
    pub fn single(single: &'a Histogram) -> Self {
        Self {
            single,
            compound: None,
        }
    }

    pub fn with_compound(single: &'a Histogram, compound: &'a Histogram) -> Self {
        Self {
            single,
            compound: Some(compound),
        }
    }

    /// The histogram responsible for `term`
    #[inline]
    pub fn model_for(&self, term: &str) -> &'a Histogram {
        match self.compound {
            Some(compound) if is_compound(term) => compound,
            _ => self.single,
        }
    }

    #[inline]
    pub fn count(&self, term: &str) -> u64 {
        self.model_for(term).count(term)
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.count(term) > 0
    }
}

/// Compound terms contain a space
#[inline]
pub fn is_compound(term: &str) -> bool {
    term.contains(' ')
}
