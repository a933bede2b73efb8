//! Reporting-time fitness breakdown of one group.

/// Higher-is-better fitness of a finalized group, with every sub-score.
///
/// The same numbers feed trial selection and the export collaborator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupFitness {
    /// Citizenship-ratio score.
    pub citizenship: f64,
    /// Overseas-country duplication score.
    pub country: f64,
    /// School duplication score.
    pub school: f64,
    /// Per-dimension similarity scores (`1 - normalized spread`), in weight order.
    pub preferences: Vec<(String, f64)>,
    /// Weighted demographic term.
    pub demographic: f64,
    /// Weighted preference term.
    pub preference: f64,
    /// Blend of the two terms.
    pub total: f64,
}

impl GroupFitness {
    /// Similarity score of one dimension.
    pub fn preference_score(&self, dimension: &str) -> Option<f64> {
        self.preferences
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, s)| *s)
    }
}

/// Mean of group totals; 0 for no groups.
pub fn mean_fitness(fitness: &[GroupFitness]) -> f64 {
    if fitness.is_empty() {
        return 0.0;
    }
    fitness.iter().map(|f| f.total).sum::<f64>() / fitness.len() as f64
}
