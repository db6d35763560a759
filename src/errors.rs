//! Typed error hierarchy for the sprint planner.
//!
//! One enum per subsystem:
//! - `ValidationError`: local, synchronous input checks (user-facing Spanish text)
//! - `BackendError`: REST backend failures
//! - `BoardError`: bucket moves that reference unknown tasks or buckets
//! - `CommitError`: bulk commit failures, including partial batches
//! - `WizardError`: step sequencer failures
//! - `ConfigError`: configuration file failures

use std::path::PathBuf;

use thiserror::Error;

use crate::assignment::BucketKey;
use crate::models::DraftId;
use crate::wizard::WizardStep;

/// Local validation failures. The `Display` text is what the user sees in the
/// inline alert, so it stays in the backend's language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Debes seleccionar un archivo para continuar")]
    MissingFile,

    #[error("Formato no soportado '{extension}'. Formatos aceptados: .doc, .docx, .txt")]
    UnsupportedFileType { extension: String },

    #[error("El archivo está vacío, agrega la descripción del sprint.")]
    EmptyFile,

    #[error("La fecha de inicio es requerida")]
    MissingStartDate,

    #[error("La fecha de fin estimada es requerida")]
    MissingEndDate,

    #[error("La fecha de fin debe ser posterior a la fecha de inicio")]
    EndNotAfterStart,

    #[error("La fecha de inicio no puede ser anterior a hoy")]
    StartInPast,

    #[error("El nombre de la tarea es requerido")]
    MissingTaskName,

    #[error("La fecha estimada es requerida")]
    MissingEstimatedDate,

    #[error("Los story points deben ser un número positivo")]
    NegativeStoryPoints,

    #[error("Los story points no pueden superar {max}")]
    StoryPointsTooLarge { max: u32 },

    #[error("Debes tener al menos una tarea para continuar")]
    NoTasks,

    #[error("Debes asignar todas las tareas antes de confirmar")]
    UnassignedTasks { count: usize },
}

/// Failures talking to the REST backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Backend returned {status} for {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid backend base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Failures moving tasks between buckets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Task {id} is not in bucket {bucket}")]
    TaskNotInBucket { id: DraftId, bucket: BucketKey },

    #[error("Bucket {0} does not exist on this board")]
    UnknownBucket(BucketKey),
}

/// Failures from the bulk commit.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "{} of {total} task creations failed ({} created, {} rolled back, {} orphaned)",
        .failures.len(),
        .created.len(),
        .rolled_back.len(),
        .orphaned.len()
    )]
    Partial {
        total: usize,
        /// Backend ids of tasks that were created.
        created: Vec<i64>,
        /// Draft tasks whose create call failed, with the reason.
        failures: Vec<(DraftId, String)>,
        /// Created tasks that were deleted again by compensation.
        rolled_back: Vec<i64>,
        /// Created tasks whose compensating delete also failed.
        orphaned: Vec<i64>,
    },
}

/// Failures from the wizard step sequencer.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Cannot {action} while the wizard is at step {step}")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },

    #[error("Task {0} is not part of this wizard run")]
    UnknownTask(DraftId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// Failures loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
}
