use driftguard_core::DriftVerdict;

/// Format the PR comment body for a drift verdict.
///
/// Fixed header, risk line, and the detailed explanation. When the model
/// proposed corrected documentation, a collapsible section holds the fix
/// verbatim inside a fenced `markdown` block.
///
/// # Examples
///
/// ```
/// use driftguard_core::{DriftVerdict, RiskLevel};
/// use driftguard_report::comment::format_comment;
///
/// let verdict = DriftVerdict {
///     has_drift: true,
///     risk_level: RiskLevel::High,
///     summary: "limit changed".into(),
///     details: "docs say 100, code enforces 500".into(),
///     fixed_content: None,
/// };
/// let body = format_comment(&verdict);
/// assert!(body.contains("Documentation Drift Report"));
/// assert!(body.contains("docs say 100"));
/// ```
pub fn format_comment(verdict: &DriftVerdict) -> String {
    let mut body = format!(
        "## \u{1f6e1}\u{fe0f} Documentation Drift Report\n\n\
         **Risk:** {}\n\n{}",
        verdict.risk_level, verdict.details,
    );

    if let Some(fixed) = &verdict.fixed_content {
        body.push_str(&format!(
            "\n\n<details><summary>\u{1f4dd} <b>Proposed Documentation Fix</b> (click to expand)</summary>\n\n\
             ```markdown\n{fixed}\n```\n</details>"
        ));
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftguard_core::RiskLevel;

    fn verdict_with_fix() -> DriftVerdict {
        DriftVerdict {
            has_drift: true,
            risk_level: RiskLevel::Medium,
            summary: "refund rules changed".into(),
            details: "Docs claim any user may refund; code restricts amounts over $500 to admins.".into(),
            fixed_content: Some("# Refunds\n\nOnly admins may refund over $500.".into()),
        }
    }

    #[test]
    fn body_contains_header_risk_and_details() {
        let body = format_comment(&verdict_with_fix());
        assert!(body.starts_with("## \u{1f6e1}\u{fe0f} Documentation Drift Report"));
        assert!(body.contains("**Risk:** MEDIUM"));
        assert!(body.contains("code restricts amounts over $500 to admins"));
    }

    #[test]
    fn fix_is_verbatim_inside_fenced_block() {
        let body = format_comment(&verdict_with_fix());
        assert!(body
            .contains("```markdown\n# Refunds\n\nOnly admins may refund over $500.\n```"));
        assert!(body.contains("<details>"));
        assert!(body.contains("</details>"));
    }

    #[test]
    fn no_collapsible_section_without_fix() {
        let mut verdict = verdict_with_fix();
        verdict.fixed_content = None;
        let body = format_comment(&verdict);
        assert!(!body.contains("<details>"));
        assert!(!body.contains("```markdown"));
    }
}
