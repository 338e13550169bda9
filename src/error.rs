use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed snbt at byte {position}: {context}")]
    Malformed { position: usize, context: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("duplicate quest id: {0}")]
    DuplicateQuestId(String),

    #[error("quests {first} and {second} both map to {filename}.json")]
    FilenameCollision {
        filename: String,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Structural problems found while translating a single quest.
///
/// These never stop the advancement from being produced; they are reported
/// next to it so the caller can warn and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quest has no id")]
    MissingId,

    #[error("quest has no tasks")]
    EmptyTasks,

    #[error("task {task} needs an item but has none")]
    MissingTaskItem { task: String },

    #[error("dependency {dependency} does not match any quest in this file")]
    UnresolvedDependency { dependency: String },

    #[error("title looks like rich text but is not valid json: {reason}")]
    MalformedTitle { reason: String },

    #[error("task {task} has unsupported type {kind:?}")]
    UnsupportedTaskType { task: String, kind: String },
}
