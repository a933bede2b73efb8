//! Scoring configuration.

use crate::error::{Error, Result};

/// Default share of the demographic term in group fitness.
pub const DEFAULT_DEMOGRAPHIC_WEIGHT: f64 = 0.4;

/// Tolerance used when checking that weights sum to 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Count of local and international agents in a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Composition {
    pub local: usize,
    pub international: usize,
}

impl Composition {
    pub fn new(local: usize, international: usize) -> Self {
        Self {
            local,
            international,
        }
    }

    pub fn total(&self) -> usize {
        self.local + self.international
    }
}

/// Two countries whose residents must not share a group.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CountryExclusion {
    first: String,
    second: String,
}

impl CountryExclusion {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Per-dimension preference weights, in declaration order.
///
/// # Examples
///
/// ```
/// use suite_alloc::scoring::PreferenceWeights;
///
/// let weights = PreferenceWeights::new()
///     .with("sleep", 0.2)
///     .with("suite", 0.4)
///     .with("cleanliness", 0.2)
///     .with("alcohol", 0.2);
/// assert!((weights.sum() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreferenceWeights(Vec<(String, f64)>);

impl PreferenceWeights {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Equal weight on every named dimension.
    pub fn uniform<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = dimensions.into_iter().map(Into::into).collect();
        let w = 1.0 / names.len().max(1) as f64;
        Self(names.into_iter().map(|n| (n, w)).collect())
    }

    /// Adds or replaces the weight of a dimension.
    pub fn with(mut self, dimension: impl Into<String>, weight: f64) -> Self {
        let dimension = dimension.into();
        match self.0.iter_mut().find(|(d, _)| *d == dimension) {
            Some(entry) => entry.1 = weight,
            None => self.0.push((dimension, weight)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(d, w)| (d.as_str(), *w))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().map(|(_, w)| w).sum()
    }
}

/// Weights of the sub-scores inside the demographic term.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemographicWeights {
    pub citizenship: f64,
    pub country: f64,
    pub school: f64,
}

impl Default for DemographicWeights {
    fn default() -> Self {
        Self {
            citizenship: 0.6,
            country: 0.0,
            school: 0.4,
        }
    }
}

/// Additive penalties of the matching-time score.
///
/// Each magnitude must exceed 1, the upper bound of the preference term, so
/// that any constraint violation outranks any preference difference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Penalties {
    /// Per repeated overseas country.
    pub duplicate_country: f64,
    /// Per repeated school.
    pub duplicate_school: f64,
    /// Group or association with a disallowed local:international count.
    pub disallowed_composition: f64,
    /// Per extra accessibility agent (or group) beyond the first.
    pub accessibility_clash: f64,
    /// No pool is eligible for every member.
    pub no_common_pool: f64,
    /// Per violated country exclusion rule.
    pub country_exclusion: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            duplicate_country: 120.0,
            duplicate_school: 100.0,
            disallowed_composition: 1000.0,
            accessibility_clash: 1000.0,
            no_common_pool: 1000.0,
            country_exclusion: 1000.0,
        }
    }
}

impl Penalties {
    fn as_array(&self) -> [(&'static str, f64); 6] {
        [
            ("duplicate_country", self.duplicate_country),
            ("duplicate_school", self.duplicate_school),
            ("disallowed_composition", self.disallowed_composition),
            ("accessibility_clash", self.accessibility_clash),
            ("no_common_pool", self.no_common_pool),
            ("country_exclusion", self.country_exclusion),
        ]
    }
}

/// Configuration of every scoring function.
///
/// # Examples
///
/// ```
/// use suite_alloc::scoring::{PreferenceWeights, ScoringConfig};
///
/// let config = ScoringConfig::default()
///     .with_weights(PreferenceWeights::uniform(["sleep", "alcohol"]))
///     .with_demographic_weight(0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    /// Preference weights; must sum to 1.
    pub weights: PreferenceWeights,

    /// Share of the demographic term in group fitness, in [0, 1]. The
    /// preference term gets the remainder.
    pub demographic_weight: f64,

    /// Sub-score weights of the demographic term; must sum to 1.
    pub demographic: DemographicWeights,

    /// Matching-time penalty magnitudes.
    pub penalties: Penalties,

    /// Exact group compositions penalized during matching.
    pub disallowed_compositions: Vec<Composition>,

    /// Exact combined compositions penalized when pairing groups.
    pub disallowed_association_compositions: Vec<Composition>,

    /// Country pairs that must not share a group or association.
    pub country_exclusions: Vec<CountryExclusion>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: PreferenceWeights::new(),
            demographic_weight: DEFAULT_DEMOGRAPHIC_WEIGHT,
            demographic: DemographicWeights::default(),
            penalties: Penalties::default(),
            disallowed_compositions: vec![Composition::new(4, 2)],
            disallowed_association_compositions: vec![
                Composition::new(7, 4),
                Composition::new(8, 4),
            ],
            country_exclusions: Vec::new(),
        }
    }
}

impl ScoringConfig {
    pub fn with_weights(mut self, weights: PreferenceWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_demographic_weight(mut self, weight: f64) -> Self {
        self.demographic_weight = weight;
        self
    }

    pub fn with_demographic_weights(mut self, weights: DemographicWeights) -> Self {
        self.demographic = weights;
        self
    }

    pub fn with_penalties(mut self, penalties: Penalties) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn with_disallowed_compositions(mut self, compositions: Vec<Composition>) -> Self {
        self.disallowed_compositions = compositions;
        self
    }

    pub fn with_disallowed_association_compositions(
        mut self,
        compositions: Vec<Composition>,
    ) -> Self {
        self.disallowed_association_compositions = compositions;
        self
    }

    pub fn with_country_exclusion(mut self, rule: CountryExclusion) -> Self {
        self.country_exclusions.push(rule);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.weights.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one preference weight is required".into(),
            ));
        }
        if let Some((d, w)) = self.weights.iter().find(|(_, w)| !(*w >= 0.0)) {
            return Err(Error::InvalidConfig(format!(
                "weight of dimension '{d}' must be non-negative, got {w}"
            )));
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::InvalidWeights { sum });
        }
        if !(0.0..=1.0).contains(&self.demographic_weight) {
            return Err(Error::InvalidConfig(format!(
                "demographic_weight must be in [0, 1], got {}",
                self.demographic_weight
            )));
        }
        let d = &self.demographic;
        if d.citizenship < 0.0 || d.country < 0.0 || d.school < 0.0 {
            return Err(Error::InvalidConfig(
                "demographic sub-weights must be non-negative".into(),
            ));
        }
        let dsum = d.citizenship + d.country + d.school;
        if (dsum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "demographic sub-weights must sum to 1, got {dsum}"
            )));
        }
        for (name, value) in self.penalties.as_array() {
            if !(value > 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "penalty '{name}' must exceed the preference scale of 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ScoringConfig {
        ScoringConfig::default().with_weights(
            PreferenceWeights::new()
                .with("sleep", 0.2)
                .with("suite", 0.4)
                .with("cleanliness", 0.2)
                .with("alcohol", 0.2),
        )
    }

    #[test]
    fn test_default_constants() {
        let config = ScoringConfig::default();
        assert!((config.demographic_weight - 0.4).abs() < 1e-12);
        assert_eq!(config.disallowed_compositions, vec![Composition::new(4, 2)]);
        assert_eq!(config.disallowed_association_compositions.len(), 2);
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_missing_weights() {
        assert!(ScoringConfig::default().validate().is_err());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = valid().with_weights(PreferenceWeights::new().with("a", 0.5).with("b", 0.4));
        match config.validate() {
            Err(Error::InvalidWeights { sum }) => assert!((sum - 0.9).abs() < 1e-12),
            other => panic!("expected InvalidWeights, got {other:?}"),
        }
    }

    #[test]
    fn test_with_replaces_existing_weight() {
        let w = PreferenceWeights::new().with("a", 0.3).with("a", 1.0);
        assert_eq!(w.len(), 1);
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_weights() {
        let w = PreferenceWeights::uniform(["a", "b", "c"]);
        assert_eq!(w.len(), 3);
        assert!((w.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bad_demographic_weight() {
        assert!(valid().with_demographic_weight(1.5).validate().is_err());
        let bad = DemographicWeights {
            citizenship: 0.5,
            country: 0.0,
            school: 0.4,
        };
        assert!(valid().with_demographic_weights(bad).validate().is_err());
    }

    #[test]
    fn test_penalties_must_dominate() {
        let weak = Penalties {
            duplicate_school: 0.5,
            ..Penalties::default()
        };
        assert!(valid().with_penalties(weak).validate().is_err());
    }
}
