//! The tool surface the agent loop exposes to the model.
//!
//! [`ToolKind`] is the closed catalog of tools: six operations covering
//! project inspection, media generation, and timeline mutation. Dispatch is
//! compile-time exhaustive; there is no string-keyed registry to fall out of
//! sync with the definitions sent to the completion API.
//!
//! [`ToolExecutor`] is the single dispatch point mapping `(tool, args,
//! context)` to a [`ToolOutcome`]. It owns authorization (every project and
//! asset reference is checked against the calling user) and every side
//! effect: job rows, asset rows, manifest writes.

pub mod args;
pub mod catalog;
pub mod executor;

pub use catalog::ToolKind;
pub use executor::{ExecutionContext, ToolExecutor, ToolOutcome};
