use std::fmt;
use std::path::{Path, PathBuf};

use driftguard_core::{DriftError, DriftVerdict, GithubConfig};

use crate::comment;

/// Everything needed to address the pull-request thread for this CI run.
///
/// Resolved once at startup from the config file and the environment.
/// Every field is optional: an incomplete context means reporting is
/// skipped, never that the run fails.
///
/// # Examples
///
/// ```
/// use driftguard_report::github::PrContext;
///
/// let ctx = PrContext {
///     token: None,
///     repository: Some("octocat/hello-world".into()),
///     pr_number: Some(7),
///     event_path: None,
/// };
/// assert_eq!(ctx.resolve_pr_number(), Some(7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrContext {
    /// Access token for the comment API.
    pub token: Option<String>,
    /// Repository slug in `owner/name` form.
    pub repository: Option<String>,
    /// Explicitly supplied PR/issue number.
    pub pr_number: Option<u64>,
    /// Path to the CI event payload, consulted when no explicit number is set.
    pub event_path: Option<PathBuf>,
}

impl PrContext {
    /// Resolve the context from config values with environment fallbacks.
    ///
    /// Token: config, then `GITHUB_TOKEN`, then `GH_TOKEN`. Repository:
    /// config, then `GITHUB_REPOSITORY`. Number: config, then `PR_NUMBER`
    /// (non-numeric values ignored). Event path: `GITHUB_EVENT_PATH`.
    pub fn from_env(config: &GithubConfig) -> Self {
        let token = config
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .or_else(|| std::env::var("GH_TOKEN").ok());
        let repository = config
            .repository
            .clone()
            .or_else(|| std::env::var("GITHUB_REPOSITORY").ok());
        let pr_number = config
            .pr_number
            .or_else(|| std::env::var("PR_NUMBER").ok().and_then(|v| v.parse().ok()));
        let event_path = std::env::var("GITHUB_EVENT_PATH").ok().map(PathBuf::from);
        Self {
            token,
            repository,
            pr_number,
            event_path,
        }
    }

    /// The thread number to comment on, if one can be determined.
    ///
    /// An explicit number always wins; otherwise the event payload is
    /// consulted. `None` means reporting should be skipped.
    pub fn resolve_pr_number(&self) -> Option<u64> {
        if let Some(number) = self.pr_number {
            return Some(number);
        }
        resolve_event_number(self.event_path.as_deref()?)
    }
}

/// Extract the PR/issue number from a CI event payload file.
///
/// Checks `pull_request.number` first, then `issue.number`. Any read or
/// parse failure yields `None` rather than an error: a broken payload only
/// means there is nowhere to post.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use driftguard_report::github::resolve_event_number;
///
/// let number = resolve_event_number(Path::new("/github/workflow/event.json"));
/// ```
pub fn resolve_event_number(path: &Path) -> Option<u64> {
    let content = std::fs::read_to_string(path).ok()?;
    let event: serde_json::Value = serde_json::from_str(&content).ok()?;
    event
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .or_else(|| event.get("issue").and_then(|issue| issue.get("number")))
        .and_then(|n| n.as_u64())
}

/// How a reporting attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The comment was created on the given thread.
    Posted {
        /// Thread number the comment landed on.
        number: u64,
    },
    /// Reporting context was incomplete; no HTTP call was made.
    Skipped {
        /// What was missing.
        reason: String,
    },
    /// The comment API call failed. Recoverable: the run continues.
    Failed {
        /// The underlying error.
        reason: String,
    },
}

impl fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportOutcome::Posted { number } => write!(f, "posted to thread #{number}"),
            ReportOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            ReportOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// GitHub issue-comment client.
pub struct CommentClient {
    octocrab: octocrab::Octocrab,
}

impl CommentClient {
    /// Build a client authenticated with a personal token.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Report`] if the client cannot be built.
    pub fn new(token: &str) -> Result<Self, DriftError> {
        let octocrab = octocrab::Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| DriftError::Report(format!("failed to create GitHub client: {e}")))?;
        Ok(Self { octocrab })
    }

    /// Create a comment on an issue or pull-request thread.
    ///
    /// # Errors
    ///
    /// Returns [`DriftError::Report`] on any API failure (non-2xx status,
    /// network error).
    pub async fn post_comment(
        &self,
        repository: &str,
        number: u64,
        body: &str,
    ) -> Result<(), DriftError> {
        let route = format!("/repos/{repository}/issues/{number}/comments");
        let payload = serde_json::json!({ "body": body });
        let _response: serde_json::Value = self
            .octocrab
            .post(route, Some(&payload))
            .await
            .map_err(|e| DriftError::Report(format!("failed to post comment: {e}")))?;
        Ok(())
    }
}

/// Post a drift verdict to the PR thread described by `ctx`.
///
/// Skips (without touching the network) when the token, repository, or
/// thread number is unavailable. API failures are folded into
/// [`ReportOutcome::Failed`] so the caller can log and move on; reporting
/// never changes the process exit code.
pub async fn report_drift(verdict: &DriftVerdict, ctx: &PrContext) -> ReportOutcome {
    let Some(token) = ctx.token.as_deref() else {
        return ReportOutcome::Skipped {
            reason: "no access token (GITHUB_TOKEN)".into(),
        };
    };
    let Some(repository) = ctx.repository.as_deref() else {
        return ReportOutcome::Skipped {
            reason: "no repository slug (GITHUB_REPOSITORY)".into(),
        };
    };
    let Some(number) = ctx.resolve_pr_number() else {
        return ReportOutcome::Skipped {
            reason: "no PR or issue number (PR_NUMBER or event payload)".into(),
        };
    };

    let client = match CommentClient::new(token) {
        Ok(client) => client,
        Err(e) => {
            return ReportOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    let body = comment::format_comment(verdict);
    match client.post_comment(repository, number, &body).await {
        Ok(()) => ReportOutcome::Posted { number },
        Err(e) => ReportOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftguard_core::RiskLevel;

    fn write_event(json: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, json).unwrap();
        (dir, path)
    }

    fn drift_verdict() -> DriftVerdict {
        DriftVerdict {
            has_drift: true,
            risk_level: RiskLevel::High,
            summary: "s".into(),
            details: "d".into(),
            fixed_content: None,
        }
    }

    #[test]
    fn event_number_prefers_pull_request() {
        let (_dir, path) =
            write_event(r#"{"pull_request": {"number": 12}, "issue": {"number": 99}}"#);
        assert_eq!(resolve_event_number(&path), Some(12));
    }

    #[test]
    fn event_number_falls_back_to_issue() {
        let (_dir, path) = write_event(r#"{"issue": {"number": 34}}"#);
        assert_eq!(resolve_event_number(&path), Some(34));
    }

    #[test]
    fn event_number_none_when_neither_present() {
        let (_dir, path) = write_event(r#"{"action": "opened"}"#);
        assert_eq!(resolve_event_number(&path), None);
    }

    #[test]
    fn event_number_none_for_missing_or_broken_payload() {
        assert_eq!(resolve_event_number(Path::new("/no/such/event.json")), None);

        let (_dir, path) = write_event("not json");
        assert_eq!(resolve_event_number(&path), None);
    }

    #[test]
    fn explicit_number_wins_over_event_payload() {
        let (_dir, path) = write_event(r#"{"pull_request": {"number": 12}}"#);
        let ctx = PrContext {
            pr_number: Some(5),
            event_path: Some(path),
            ..PrContext::default()
        };
        assert_eq!(ctx.resolve_pr_number(), Some(5));
    }

    #[tokio::test]
    async fn missing_token_skips_without_io() {
        let ctx = PrContext {
            repository: Some("octocat/hello-world".into()),
            pr_number: Some(1),
            ..PrContext::default()
        };
        let outcome = report_drift(&drift_verdict(), &ctx).await;
        match outcome {
            ReportOutcome::Skipped { reason } => assert!(reason.contains("token")),
            other => panic!("expected skip, got: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_repository_skips() {
        let ctx = PrContext {
            token: Some("ghp_test".into()),
            pr_number: Some(1),
            ..PrContext::default()
        };
        let outcome = report_drift(&drift_verdict(), &ctx).await;
        match outcome {
            ReportOutcome::Skipped { reason } => assert!(reason.contains("repository")),
            other => panic!("expected skip, got: {other}"),
        }
    }

    #[tokio::test]
    async fn unresolvable_number_skips() {
        let ctx = PrContext {
            token: Some("ghp_test".into()),
            repository: Some("octocat/hello-world".into()),
            ..PrContext::default()
        };
        let outcome = report_drift(&drift_verdict(), &ctx).await;
        match outcome {
            ReportOutcome::Skipped { reason } => assert!(reason.contains("number")),
            other => panic!("expected skip, got: {other}"),
        }
    }
}
