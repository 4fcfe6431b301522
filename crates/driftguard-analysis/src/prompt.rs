use driftguard_core::{DriftError, DriftVerdict, RiskLevel};
use serde::Deserialize;

const AUDIT_SYSTEM_PROMPT: &str = "\
You are a senior documentation auditor. You compare the extracted INTENT of \
code changes against the project DOCUMENTATION and flag drift.

Rules:
- Flag outright CONTRADICTIONS and invalidated claims, not missing polish
- Do not flag style, tone, or formatting of the documentation
- Judge only against the code intent you are given, never speculate beyond it
- If the documentation and code agree, say so

Respond with a JSON object:
{
  \"has_drift\": true | false,
  \"risk_level\": \"HIGH\" | \"MEDIUM\" | \"LOW\",
  \"summary\": \"Short executive summary of the issue\",
  \"details\": \"Detailed explanation of the contradiction\",
  \"fixed_content\": \"Full corrected documentation text, or null when there is no drift\"
}";

/// Build the stage-1 prompt asking the model to extract code intent.
///
/// The model is told to ignore refactors and formatting and describe only the
/// logic, rules, and behaviors the code enforces.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::prompt::build_intent_prompt;
///
/// let prompt = build_intent_prompt("--- FILE: a.py ---\nx = 1\n");
/// assert!(prompt.contains("--- FILE: a.py ---"));
/// ```
pub fn build_intent_prompt(code: &str) -> String {
    format!(
        "Analyze the following CODE.\n\
         Identify the core LOGIC, RULES, and BEHAVIORS that are being enforced.\n\
         Ignore formatting and refactoring. Focus on what the code actually DOES.\n\n\
         --- CODE ---\n{code}"
    )
}

/// Build the system prompt for the stage-2 audit.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::prompt::build_audit_system_prompt;
///
/// let prompt = build_audit_system_prompt();
/// assert!(prompt.contains("has_drift"));
/// ```
pub fn build_audit_system_prompt() -> String {
    AUDIT_SYSTEM_PROMPT.to_string()
}

/// Build the stage-2 user prompt comparing code intent against documentation.
///
/// Poses the three audit questions: direct contradiction, missing critical
/// detail, and invalidated code examples.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::prompt::build_audit_prompt;
///
/// let prompt = build_audit_prompt("refunds over $500 need admin", "# Refunds");
/// assert!(prompt.contains("refunds over $500 need admin"));
/// assert!(prompt.contains("# Refunds"));
/// ```
pub fn build_audit_prompt(intent: &str, doc: &str) -> String {
    format!(
        "--- CODE INTENT (ground truth) ---\n{intent}\n\n\
         --- DOCUMENTATION ---\n{doc}\n\n\
         --- TASK ---\n\
         1. Does the documentation contradict the code intent?\n\
         2. Is the documentation missing critical details present in the code?\n\
         3. Are the code examples in the documentation still valid?\n\n\
         Return the JSON verdict."
    )
}

#[derive(Deserialize)]
struct VerdictWire {
    has_drift: bool,
    risk_level: Option<String>,
    summary: Option<String>,
    details: Option<String>,
    fixed_content: Option<String>,
}

/// Parse the audit response into a validated [`DriftVerdict`].
///
/// Handles markdown code fences around the JSON. Malformed JSON, or JSON
/// missing the `has_drift` gate field, is a fatal [`DriftError::Parse`];
/// no default verdict is ever substituted. The informational fields are
/// tolerated when absent: risk level falls back to `LOW`, summary and
/// details to empty strings.
///
/// # Errors
///
/// Returns [`DriftError::Parse`] when the response is not a JSON object of
/// the expected shape.
///
/// # Examples
///
/// ```
/// use driftguard_analysis::prompt::parse_verdict;
///
/// let verdict = parse_verdict(r#"{"has_drift": false}"#).unwrap();
/// assert!(!verdict.has_drift);
///
/// assert!(parse_verdict("not json").is_err());
/// ```
pub fn parse_verdict(response: &str) -> Result<DriftVerdict, DriftError> {
    let cleaned = strip_code_fences(response);

    let wire: VerdictWire = serde_json::from_str(cleaned)
        .map_err(|e| DriftError::Parse(format!("completion is not a valid verdict: {e}")))?;

    let risk_level = match wire.risk_level.as_deref() {
        Some(s) => s.parse::<RiskLevel>().unwrap_or_default(),
        None => RiskLevel::default(),
    };

    Ok(DriftVerdict {
        has_drift: wire.has_drift,
        risk_level,
        summary: wire.summary.unwrap_or_default(),
        details: wire.details.unwrap_or_default(),
        fixed_content: wire.fixed_content,
    })
}

fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    if let Some(rest) = trimmed.strip_prefix("```") {
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }
    trimmed
}
