//! Sprint planning from a requirements document.
//!
//! A run goes Upload → Metadata → Review → Assignment → Commit: the document
//! is sent to the backend for task suggestions, the suggestions are reviewed,
//! auto-assigned to team members by their responsible hint, rearranged, and
//! finally created on the backend in one concurrent batch.

pub mod assignment;
pub mod backend;
pub mod commit;
pub mod errors;
pub mod init;
pub mod logging;
pub mod models;
pub mod planner_config;
pub mod ui;
pub mod upload;
pub mod wizard;

#[cfg(test)]
pub(crate) mod testutil;

pub use assignment::{AssignmentBoard, BucketKey, auto_assign};
pub use backend::{HttpBackend, TaskBackend};
pub use commit::{CommitContext, CommitPolicy, CommitReport, build_commit_plan, execute_commit};
pub use wizard::{Wizard, WizardStep};
