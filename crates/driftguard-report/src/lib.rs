//! CI reporting: PR context resolution, comment formatting, and the GitHub
//! issue-comment post.
//!
//! Reporting is best-effort by design: an incomplete context skips silently
//! and an API failure is logged and swallowed, so the process exit code is
//! always governed by the drift verdict alone.

pub mod comment;
pub mod github;

pub use comment::format_comment;
pub use github::{report_drift, PrContext, ReportOutcome};
