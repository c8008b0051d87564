use thiserror::Error;

/// Input rejected before any mutation took place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("user id must not be empty")]
    EmptyUserId,
    #[error("muscle group is required")]
    EmptyMuscleGroup,
    #[error("exercise name is required")]
    EmptyExerciseName,
    #[error("weight must be a finite number >= 0, got {0}")]
    InvalidWeight(f64),
    #[error("exercise \"{name}\" already exists for {muscle_group}")]
    DuplicateExercise { name: String, muscle_group: String },
    #[error("template \"{0}\" is built in and cannot be replaced")]
    BuiltInTemplate(String),
    #[error("template id must not be empty")]
    EmptyTemplateId,
    #[error("template \"{0}\" has no exercises")]
    EmptyTemplate(String),
}

/// Failures of the underlying key-value medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage limit exceeded writing {key}: {size} bytes > {limit} bytes, export a backup")]
    QuotaExceeded { key: String, size: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to serialize store: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a JSON backup is refused.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("backup is missing the \"{0}\" key")]
    MissingKey(&'static str),
    #[error("backup has an unexpected structure: {0}")]
    Structure(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown merge strategy: {0}")]
    UnknownStrategy(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
