//! Result entry types shared by the collection, the table, and the wire layer.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Stable handle for one entry inside a [`ResultsCollection`](super::collection::ResultsCollection).
///
/// Display order is still positional; the handle only guards against misaddressing
/// once rows can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub(crate) u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse reliability tier attached to a suggestion. Display only.
///
/// Decoding never fails: numbers, `null`, and unrecognized labels all become `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Confidence::from_label).unwrap_or_default())
    }
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
            Confidence::Unknown => "unknown",
        }
    }

    /// Parse a tier label, falling back to `Unknown` for anything unrecognized.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Confidence::Low,
            "medium" => Confidence::Medium,
            "high" => Confidence::High,
            _ => Confidence::Unknown,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected CTA with its proposed replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    #[serde(default)]
    pub original_cta: String,
    #[serde(default)]
    pub suggested_improvement: String,
    #[serde(default)]
    pub confidence: Confidence,
    /// Empty strings decode as `None`, so the CSV and JSON paths agree.
    #[serde(default, deserialize_with = "non_empty_source")]
    pub source: Option<String>,
}

fn non_empty_source<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let source = Option::<String>::deserialize(deserializer)?;
    Ok(source.filter(|s| !s.is_empty()))
}

impl ResultEntry {
    pub fn new(
        original_cta: impl Into<String>,
        suggested_improvement: impl Into<String>,
        confidence: Confidence,
        source: Option<String>,
    ) -> Self {
        Self {
            original_cta: original_cta.into(),
            suggested_improvement: suggested_improvement.into(),
            confidence,
            source: source.filter(|s| !s.is_empty()),
        }
    }

    /// Label shown in the source column.
    pub fn source_label(&self) -> &str {
        match self.source.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "N/A",
        }
    }
}

/// Counters reported with an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub ctas_analyzed: u32,
    #[serde(default)]
    pub suggestions_provided: u32,
}

impl Stats {
    /// Derive counters from a result set when the service did not send any.
    pub fn from_results(results: &[ResultEntry]) -> Self {
        let suggestions = results
            .iter()
            .filter(|r| !r.suggested_improvement.trim().is_empty())
            .count();
        Self {
            ctas_analyzed: results.len() as u32,
            suggestions_provided: suggestions as u32,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} CTAs analyzed \u{b7} {} suggestions provided",
            self.ctas_analyzed, self.suggestions_provided
        )
    }
}
