//! Drift analysis: completion client with model fallback, prompt
//! construction, and the two-stage audit pipeline.
//!
//! Stage 1 extracts the behavioral intent of the code under analysis;
//! stage 2 audits the documentation against that intent and yields a
//! structured [`pipeline::DriftReport`].

pub mod llm;
pub mod pipeline;
pub mod prompt;
