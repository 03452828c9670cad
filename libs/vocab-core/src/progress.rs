//! Category mastery and progress bars.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mastery percentage (0-100) per category, as reported by the backend.
///
/// Values outside 0-100 are clamped on the way in, whether inserted or
/// deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct ProgressMap(BTreeMap<String, f64>);

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Set a category's mastery, clamped to 0-100.
    pub fn insert(&mut self, category: impl Into<String>, percent: f64) {
        self.0.insert(category.into(), percent.clamp(0.0, 100.0));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Mean mastery of a group's members; absent members count as 0.
    pub fn group_mean(&self, members: &[String]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        let total: f64 = members.iter().map(|m| self.get(m).unwrap_or(0.0)).sum();
        total / members.len() as f64
    }

    /// Bars for every leaf category followed by every group.
    pub fn bars(&self, groups: &CategoryGroups) -> Vec<ProgressBar> {
        let leaves = self.iter().map(|(category, percent)| ProgressBar::new(category, percent));
        let aggregates = groups
            .iter()
            .map(|(group, members)| ProgressBar::new(group, self.group_mean(members)));
        leaves.chain(aggregates).collect()
    }
}

impl FromIterator<(String, f64)> for ProgressMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (category, percent) in iter {
            map.insert(category, percent);
        }
        map
    }
}

impl From<BTreeMap<String, f64>> for ProgressMap {
    fn from(raw: BTreeMap<String, f64>) -> Self {
        raw.into_iter().collect()
    }
}

impl From<ProgressMap> for BTreeMap<String, f64> {
    fn from(map: ProgressMap) -> Self {
        map.0
    }
}

/// Aggregate progress keys and the leaf categories they summarize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroups(BTreeMap<String, Vec<String>>);

impl CategoryGroups {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, group: impl Into<String>, members: Vec<String>) {
        self.0.insert(group.into(), members);
    }

    pub fn members(&self, group: &str) -> Option<&[String]> {
        self.0.get(group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl Default for CategoryGroups {
    fn default() -> Self {
        let mut groups = Self::new();
        groups.insert(
            "basics",
            to_strings(&[
                "colors",
                "numbers",
                "time",
                "countries_languages",
                "directions",
                "basic_phrases",
                "communication",
            ]),
        );
        groups.insert(
            "grammar_basics",
            to_strings(&[
                "w_questions",
                "prepositions",
                "pronouns",
                "conversation_particles",
                "negation",
                "time_expressions",
                "possesive_pronouns",
                "demonstratives",
                "quantifiers",
            ]),
        );
        groups
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Coarse mastery band used to color a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasteryTier {
    Critical,
    Poor,
    Fair,
    Good,
    Strong,
    Mastered,
}

impl MasteryTier {
    pub fn from_percent(percent: f64) -> Self {
        match percent {
            p if p < 20.0 => Self::Critical,
            p if p < 40.0 => Self::Poor,
            p if p < 60.0 => Self::Fair,
            p if p < 80.0 => Self::Good,
            p if p < 99.0 => Self::Strong,
            _ => Self::Mastered,
        }
    }

    /// Bar fill color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#ff3b3b",
            Self::Poor => "#f79046",
            Self::Fair => "#f7bf46",
            Self::Good => "#daf746",
            Self::Strong => "#63de4a",
            Self::Mastered => "#36ff54",
        }
    }
}

/// A rendered progress bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressBar {
    pub category: String,
    pub percent: f64,
    pub tier: MasteryTier,
}

impl ProgressBar {
    pub fn new(category: impl Into<String>, percent: f64) -> Self {
        Self {
            category: category.into(),
            percent,
            tier: MasteryTier::from_percent(percent),
        }
    }

    /// Mastered bars pulse.
    pub fn glows(&self) -> bool {
        self.tier == MasteryTier::Mastered
    }
}
