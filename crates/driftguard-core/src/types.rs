use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Risk classification attached to a drift verdict.
///
/// Informational only: control flow is gated exclusively on
/// [`DriftVerdict::has_drift`], never on the risk level.
///
/// # Examples
///
/// ```
/// use driftguard_core::RiskLevel;
///
/// let level: RiskLevel = serde_json::from_str("\"HIGH\"").unwrap();
/// assert_eq!(level, RiskLevel::High);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// The documentation actively misleads readers about current behavior.
    High,
    /// The contradiction is real but unlikely to cause serious harm.
    Medium,
    /// Minor or cosmetic disagreement.
    #[default]
    Low,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::Low => write!(f, "LOW"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HIGH" => Ok(RiskLevel::High),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "LOW" => Ok(RiskLevel::Low),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// The structured result of one drift analysis.
///
/// Produced once per run by the audit stage and never mutated afterwards.
/// `has_drift` is the sole gate for reporting and for the process exit code;
/// every other field is explanatory.
///
/// # Examples
///
/// ```
/// use driftguard_core::{DriftVerdict, RiskLevel};
///
/// let verdict = DriftVerdict {
///     has_drift: true,
///     risk_level: RiskLevel::High,
///     summary: "Docs describe the old refund limit".into(),
///     details: "The code rejects refunds over $500 for non-admins".into(),
///     fixed_content: None,
/// };
/// assert!(verdict.has_drift);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftVerdict {
    /// Whether the documentation contradicts the code's actual behavior.
    pub has_drift: bool,
    /// Severity of the contradiction.
    pub risk_level: RiskLevel,
    /// Short executive summary of the finding.
    pub summary: String,
    /// Detailed explanation of the contradiction.
    pub details: String,
    /// Full corrected documentation text, when the model proposed one.
    pub fixed_content: Option<String>,
}

impl DriftVerdict {
    /// A verdict stating the documentation matches the code.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftguard_core::DriftVerdict;
    ///
    /// let verdict = DriftVerdict::in_sync("docs match");
    /// assert!(!verdict.has_drift);
    /// assert!(verdict.fixed_content.is_none());
    /// ```
    pub fn in_sync(summary: impl Into<String>) -> Self {
        Self {
            has_drift: false,
            risk_level: RiskLevel::Low,
            summary: summary.into(),
            details: String::new(),
            fixed_content: None,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use driftguard_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary (default).
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_roundtrips_through_json() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");

        let parsed: RiskLevel = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, RiskLevel::Low);
    }

    #[test]
    fn risk_level_from_str() {
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!("medium".parse::<RiskLevel>().unwrap(), RiskLevel::Medium);
        assert_eq!("Low".parse::<RiskLevel>().unwrap(), RiskLevel::Low);
        assert!("critical".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn risk_level_defaults_to_low() {
        assert_eq!(RiskLevel::default(), RiskLevel::Low);
    }

    #[test]
    fn verdict_serializes_camel_case() {
        let verdict = DriftVerdict {
            has_drift: true,
            risk_level: RiskLevel::High,
            summary: "s".into(),
            details: "d".into(),
            fixed_content: Some("fixed".into()),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert!(json.get("hasDrift").is_some());
        assert!(json.get("riskLevel").is_some());
        assert!(json.get("has_drift").is_none());
    }

    #[test]
    fn in_sync_verdict_has_no_fix() {
        let verdict = DriftVerdict::in_sync("all good");
        assert!(!verdict.has_drift);
        assert_eq!(verdict.risk_level, RiskLevel::Low);
        assert_eq!(verdict.summary, "all good");
        assert!(verdict.details.is_empty());
        assert!(verdict.fixed_content.is_none());
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn output_format_default_is_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }
}
