//! Agent records.

use super::eligibility::PoolSet;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Stable handle of an agent inside its [`Population`](super::Population).
///
/// The handle is the agent's index in the population and is the only key
/// used by score tables and group occupant lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub usize);

impl AgentId {
    /// Returns the index into the owning population.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category used to split agents into two populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sex {
    Female,
    Male,
}

/// Citizenship class derived from residency countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Citizenship {
    /// At least one residency country is the home country.
    Local,
    /// No residency country is the home country.
    International,
}

/// One individual to be placed in a group.
///
/// Agents are immutable once built. Construction goes through [`Agent::new`]
/// followed by the `with_*` builders.
///
/// # Examples
///
/// ```
/// use suite_alloc::model::{Agent, Citizenship, Sex};
///
/// let agent = Agent::new("A0001", Sex::Female, "RJC", ["Singapore"], "Singapore")
///     .with_preference("sleep", 2)
///     .with_eligible_pools(["Saga", "Elm"]);
/// assert_eq!(agent.citizenship(), Citizenship::Local);
/// assert_eq!(agent.preference("sleep"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    key: String,
    sex: Sex,
    school: String,
    countries: BTreeSet<String>,
    citizenship: Citizenship,
    accessibility: bool,
    eligible_pools: PoolSet,
    preferences: BTreeMap<String, u32>,
    attributes: BTreeMap<String, String>,
}

impl Agent {
    /// Creates an agent. Citizenship is `Local` when any of `countries`
    /// equals `home_country`.
    pub fn new<I, S>(
        key: impl Into<String>,
        sex: Sex,
        school: impl Into<String>,
        countries: I,
        home_country: &str,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let countries: BTreeSet<String> = countries.into_iter().map(Into::into).collect();
        let citizenship = if countries.contains(home_country) {
            Citizenship::Local
        } else {
            Citizenship::International
        };
        Self {
            key: key.into(),
            sex,
            school: school.into(),
            countries,
            citizenship,
            accessibility: false,
            eligible_pools: PoolSet::Any,
            preferences: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Marks the agent as requiring an accessibility group.
    pub fn with_accessibility(mut self, accessibility: bool) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Restricts the pools this agent may be assigned to.
    pub fn with_eligible_pools<I, S>(mut self, pools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_pools = PoolSet::only(pools);
        self
    }

    /// Sets the ordinal code for one living-preference dimension.
    pub fn with_preference(mut self, dimension: impl Into<String>, code: u32) -> Self {
        self.preferences.insert(dimension.into(), code);
        self
    }

    /// Attaches an attribute that scoring ignores.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn school(&self) -> &str {
        &self.school
    }

    pub fn countries(&self) -> &BTreeSet<String> {
        &self.countries
    }

    pub fn citizenship(&self) -> Citizenship {
        self.citizenship
    }

    pub fn is_local(&self) -> bool {
        self.citizenship == Citizenship::Local
    }

    pub fn needs_accessibility(&self) -> bool {
        self.accessibility
    }

    pub fn eligible_pools(&self) -> &PoolSet {
        &self.eligible_pools
    }

    /// Returns the code for a dimension, if declared.
    pub fn preference(&self, dimension: &str) -> Option<u32> {
        self.preferences.get(dimension).copied()
    }

    pub fn preferences(&self) -> &BTreeMap<String, u32> {
        &self.preferences
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citizenship_from_any_residency() {
        let dual = Agent::new("a", Sex::Male, "X", ["Malaysia", "Singapore"], "Singapore");
        assert_eq!(dual.citizenship(), Citizenship::Local);

        let intl = Agent::new("b", Sex::Male, "Y", ["Malaysia"], "Singapore");
        assert_eq!(intl.citizenship(), Citizenship::International);
        assert!(!intl.is_local());
    }

    #[test]
    fn test_builders() {
        let agent = Agent::new("c", Sex::Female, "Z", ["India"], "Singapore")
            .with_accessibility(true)
            .with_eligible_pools(["Elm"])
            .with_preference("sleep", 3)
            .with_attribute("gender_pref", "any");

        assert!(agent.needs_accessibility());
        assert!(agent.eligible_pools().contains("Elm"));
        assert!(!agent.eligible_pools().contains("Saga"));
        assert_eq!(agent.preference("sleep"), Some(3));
        assert_eq!(agent.preference("alcohol"), None);
        assert_eq!(agent.attribute("gender_pref"), Some("any"));
        assert_eq!(agent.to_string(), "c");
    }

    #[test]
    fn test_default_eligibility_is_unrestricted() {
        let agent = Agent::new("d", Sex::Female, "Z", ["India"], "Singapore");
        assert_eq!(agent.eligible_pools(), &PoolSet::Any);
    }
}
