//! Per-dimension normalization of spreads.
//!
//! The maximum spread of a dimension is found by enumerating every multiset
//! of `group_size` codes drawn with repetition from its alphabet. The table
//! is built once, before any trial, and is read-only afterwards.

use super::spread::pairwise_spread;
use std::collections::BTreeMap;

/// A living-preference dimension and its ordered alphabet.
///
/// Codes are positions in the alphabet: the first label is code 0.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    name: String,
    labels: Vec<String>,
}

impl Dimension {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// A dimension whose labels are the codes `0..size` themselves.
    pub fn with_size(name: impl Into<String>, size: usize) -> Self {
        Self::new(name, (0..size).map(|c| c.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, code: u32) -> Option<&str> {
        self.labels.get(code as usize).map(String::as_str)
    }

    pub fn code_of(&self, label: &str) -> Option<u32> {
        self.labels.iter().position(|l| l == label).map(|p| p as u32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Entry {
    alphabet_len: usize,
    max_spread: f64,
}

/// Lookup table of maximum spreads, one per dimension.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Normalizer {
    group_size: usize,
    entries: BTreeMap<String, Entry>,
}

impl Normalizer {
    /// Builds the table for groups of `group_size`.
    pub fn new(dimensions: &[Dimension], group_size: usize) -> Self {
        let entries = dimensions
            .iter()
            .map(|d| {
                let entry = Entry {
                    alphabet_len: d.len(),
                    max_spread: max_spread(d.len(), group_size),
                };
                (d.name().to_string(), entry)
            })
            .collect();
        Self {
            group_size,
            entries,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn contains(&self, dimension: &str) -> bool {
        self.entries.contains_key(dimension)
    }

    pub fn alphabet_len(&self, dimension: &str) -> Option<usize> {
        self.entries.get(dimension).map(|e| e.alphabet_len)
    }

    pub fn max_spread(&self, dimension: &str) -> Option<f64> {
        self.entries.get(dimension).map(|e| e.max_spread)
    }

    /// Maps a spread onto [0, 1]. `None` for an unknown dimension.
    ///
    /// A dimension with a single-letter alphabet has no spread and always
    /// normalizes to 0. Spreads from groups smaller than `group_size` can
    /// exceed the table maximum and are clamped.
    pub fn normalize(&self, spread: f64, dimension: &str) -> Option<f64> {
        let max = self.max_spread(dimension)?;
        if max <= 0.0 {
            return Some(0.0);
        }
        Some((spread / max).clamp(0.0, 1.0))
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Maximum spread over all multisets of `size` codes from `0..alphabet_len`.
fn max_spread(alphabet_len: usize, size: usize) -> f64 {
    if alphabet_len == 0 || size < 2 {
        return 0.0;
    }
    let mut buf = Vec::with_capacity(size);
    let mut best = 0.0f64;
    visit_multisets(alphabet_len as u32, size, 0, &mut buf, &mut |m| {
        best = best.max(pairwise_spread(m));
    });
    best
}

/// Calls `f` for every non-decreasing sequence of `size` codes.
fn visit_multisets<F: FnMut(&[u32])>(
    alphabet_len: u32,
    size: usize,
    start: u32,
    buf: &mut Vec<u32>,
    f: &mut F,
) {
    if buf.len() == size {
        f(buf);
        return;
    }
    for code in start..alphabet_len {
        buf.push(code);
        visit_multisets(alphabet_len, size, code, buf, f);
        buf.pop();
    }
}
