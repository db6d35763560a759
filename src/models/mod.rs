//! Domain types for the planning wizard.

mod member;
mod sprint;
mod task;

pub use member::TeamMember;
pub use sprint::SprintDraft;
pub use task::{DraftId, DraftIdAllocator, DraftTask, DraftTaskInput, TaskStatus};
