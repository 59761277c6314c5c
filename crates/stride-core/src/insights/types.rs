//! Core types for the insight engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kinds of insights surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Encouraging signal - behavior worth keeping up
    Positive,
    /// Unfavorable signal that isn't urgent yet
    Negative,
    /// Should be addressed soon
    Warning,
    /// Neutral observation
    Info,
    /// Requires immediate attention
    Alert,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::Positive => "positive",
            InsightKind::Negative => "negative",
            InsightKind::Warning => "warning",
            InsightKind::Info => "info",
            InsightKind::Alert => "alert",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(InsightKind::Positive),
            "negative" => Ok(InsightKind::Negative),
            "warning" => Ok(InsightKind::Warning),
            "info" => Ok(InsightKind::Info),
            "alert" => Ok(InsightKind::Alert),
            _ => Err(format!("Unknown insight kind: {}", s)),
        }
    }
}

/// A single behavioral insight
///
/// Produced fresh on each request and never persisted. Lower priority
/// means more urgent; the aggregator sorts ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub icon: String,
    pub priority: i32,
    pub title: String,
    pub message: String,
    pub tip: String,
    /// Identifier of the generator that produced this insight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        icon: impl Into<String>,
        priority: i32,
        title: impl Into<String>,
        message: impl Into<String>,
        tip: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            icon: icon.into(),
            priority,
            title: title.into(),
            message: message.into(),
            tip: tip.into(),
            source: None,
        }
    }

    /// Label the insight with its producing generator
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Round a percentage to one decimal place for display
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
