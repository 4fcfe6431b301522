use std::fmt;

use driftguard_core::{CodeBundle, DriftError, DriftVerdict};
use serde::Serialize;

use crate::llm::{ChatMessage, CompletionClient, Role};
use crate::prompt;

/// Prose description of what the code actually does, extracted in stage 1.
///
/// Feeding the audit a constrained intent summary instead of raw code keeps
/// stage 2 focused on a single question: does the documentation agree with
/// this behavior?
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeIntent {
    /// The extracted behavioral summary.
    pub text: String,
    /// Model that produced the summary.
    pub model: String,
}

/// Statistics about a completed drift analysis.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::pipeline::AnalysisStats;
///
/// let stats = AnalysisStats {
///     files_analyzed: 2,
///     doc_bytes: 1024,
///     intent_model: "gemini-2.0-flash".into(),
///     audit_model: "gemini-2.0-flash".into(),
/// };
/// assert_eq!(stats.files_analyzed, 2);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    /// Number of source files in the bundle.
    pub files_analyzed: usize,
    /// Size of the documentation text in bytes.
    pub doc_bytes: usize,
    /// Model that served the intent-extraction call.
    pub intent_model: String,
    /// Model that served the audit call.
    pub audit_model: String,
}

/// Result of a completed drift analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    /// The parsed verdict.
    pub verdict: DriftVerdict,
    /// Statistics about the run.
    pub stats: AnalysisStats,
}

/// Two-stage drift analyzer.
///
/// Stage 1 extracts the behavioral intent of the code; stage 2 audits the
/// documentation against that intent and returns a structured verdict. The
/// stages run strictly in sequence and each is one completion call (with the
/// client's own model fallback underneath).
pub struct DriftPipeline {
    client: CompletionClient,
}

impl DriftPipeline {
    /// Create a pipeline around a completion client.
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Stage 1: extract what the code actually does.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::ModelsExhausted`] if no candidate model
    /// produced a completion.
    pub async fn extract_intent(&self, bundle: &CodeBundle) -> Result<CodeIntent, DriftError> {
        let messages = vec![ChatMessage {
            role: Role::User,
            content: prompt::build_intent_prompt(&bundle.render()),
        }];
        let completion = self.client.complete(&messages, false).await?;
        Ok(CodeIntent {
            text: completion.text,
            model: completion.model,
        })
    }

    /// Stage 2: audit the documentation against the extracted intent.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::ModelsExhausted`] if no candidate model
    /// produced a completion, or [`DriftError::Parse`] if the completion is
    /// not a valid verdict.
    pub async fn audit(
        &self,
        intent: &CodeIntent,
        bundle: &CodeBundle,
        doc: &str,
    ) -> Result<DriftReport, DriftError> {
        let messages = vec![
            ChatMessage {
                role: Role::System,
                content: prompt::build_audit_system_prompt(),
            },
            ChatMessage {
                role: Role::User,
                content: prompt::build_audit_prompt(&intent.text, doc),
            },
        ];
        let completion = self.client.complete(&messages, true).await?;
        let verdict = prompt::parse_verdict(&completion.text)?;

        Ok(DriftReport {
            verdict,
            stats: AnalysisStats {
                files_analyzed: bundle.len(),
                doc_bytes: doc.len(),
                intent_model: intent.model.clone(),
                audit_model: completion.model,
            },
        })
    }

    /// Run both stages and return the final report.
    ///
    /// # Errors
    ///
    /// Propagates any stage error; see [`Self::extract_intent`] and
    /// [`Self::audit`].
    pub async fn analyze(
        &self,
        bundle: &CodeBundle,
        doc: &str,
    ) -> Result<DriftReport, DriftError> {
        let intent = self.extract_intent(bundle).await?;
        self.audit(&intent, bundle, doc).await
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Documentation Drift Audit")?;
        writeln!(f, "=========================")?;
        let status = if self.verdict.has_drift {
            "DRIFT DETECTED"
        } else {
            "IN SYNC"
        };
        writeln!(
            f,
            "Status: {status} | Risk: {} | Files: {} | Models: {} / {}\n",
            self.verdict.risk_level,
            self.stats.files_analyzed,
            self.stats.intent_model,
            self.stats.audit_model,
        )?;

        if !self.verdict.summary.is_empty() {
            writeln!(f, "Summary: {}", self.verdict.summary)?;
        }
        if self.verdict.has_drift && !self.verdict.details.is_empty() {
            writeln!(f, "\nDetails:\n{}", self.verdict.details)?;
        }
        Ok(())
    }
}

impl DriftReport {
    /// Render the report as markdown.
    ///
    /// # Examples
    ///
    /// ```
    /// use driftguard_analysis::pipeline::{AnalysisStats, DriftReport};
    /// use driftguard_core::DriftVerdict;
    ///
    /// let report = DriftReport {
    ///     verdict: DriftVerdict::in_sync("docs match"),
    ///     stats: AnalysisStats {
    ///         files_analyzed: 1,
    ///         doc_bytes: 10,
    ///         intent_model: "m".into(),
    ///         audit_model: "m".into(),
    ///     },
    /// };
    /// assert!(report.to_markdown().contains("# Documentation Drift Audit"));
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Documentation Drift Audit\n\n");
        let status = if self.verdict.has_drift {
            "\u{1f6a8} Drift detected"
        } else {
            "\u{2705} In sync"
        };
        out.push_str(&format!(
            "**Status:** {status} | **Risk:** {} | **Files:** {}\n\n",
            self.verdict.risk_level, self.stats.files_analyzed,
        ));

        if !self.verdict.summary.is_empty() {
            out.push_str(&format!("{}\n\n", self.verdict.summary));
        }
        if self.verdict.has_drift && !self.verdict.details.is_empty() {
            out.push_str(&format!("## Details\n\n{}\n\n", self.verdict.details));
        }
        if let Some(fixed) = &self.verdict.fixed_content {
            out.push_str(&format!(
                "## Proposed fix\n\n```markdown\n{fixed}\n```\n"
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftguard_core::RiskLevel;

    fn drift_report() -> DriftReport {
        DriftReport {
            verdict: DriftVerdict {
                has_drift: true,
                risk_level: RiskLevel::High,
                summary: "Refund limit changed".into(),
                details: "Docs allow any user; code requires admin.".into(),
                fixed_content: Some("# Refunds\nAdmins only over $500.".into()),
            },
            stats: AnalysisStats {
                files_analyzed: 2,
                doc_bytes: 512,
                intent_model: "gemini-2.0-flash".into(),
                audit_model: "gemini-1.5-flash".into(),
            },
        }
    }

    #[test]
    fn display_shows_status_and_details() {
        let text = format!("{}", drift_report());
        assert!(text.contains("DRIFT DETECTED"));
        assert!(text.contains("Risk: HIGH"));
        assert!(text.contains("code requires admin"));
    }

    #[test]
    fn display_in_sync_omits_details() {
        let report = DriftReport {
            verdict: DriftVerdict::in_sync("docs match"),
            stats: AnalysisStats {
                files_analyzed: 1,
                doc_bytes: 10,
                intent_model: "m".into(),
                audit_model: "m".into(),
            },
        };
        let text = format!("{report}");
        assert!(text.contains("IN SYNC"));
        assert!(!text.contains("Details:"));
    }

    #[test]
    fn markdown_includes_fix_verbatim() {
        let md = drift_report().to_markdown();
        assert!(md.contains("# Documentation Drift Audit"));
        assert!(md.contains("## Details"));
        assert!(md.contains("```markdown\n# Refunds\nAdmins only over $500.\n```"));
    }

    #[test]
    fn report_serializes_camel_case() {
        let json = serde_json::to_value(drift_report()).unwrap();
        assert!(json["stats"].get("filesAnalyzed").is_some());
        assert!(json["verdict"].get("hasDrift").is_some());
        assert!(json["stats"].get("files_analyzed").is_none());
    }
}
