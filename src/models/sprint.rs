use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Date range captured by the metadata step.
///
/// Never persisted on its own: it only supplies defaults for the suggested
/// tasks (estimated date, project) and is discarded with the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintDraft {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project_id: i64,
}

impl SprintDraft {
    /// Validate a form submission. `today` is injected so callers decide the clock.
    pub fn new(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        project_id: i64,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let start_date = start_date.ok_or(ValidationError::MissingStartDate)?;
        let end_date = end_date.ok_or(ValidationError::MissingEndDate)?;
        if end_date <= start_date {
            return Err(ValidationError::EndNotAfterStart);
        }
        if start_date < today {
            return Err(ValidationError::StartInPast);
        }
        Ok(Self {
            start_date,
            end_date,
            project_id,
        })
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}
