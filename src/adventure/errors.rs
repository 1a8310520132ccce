use thiserror::Error;

/// Errors that can arise while loading the world or resolving templates during play.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around IO errors (world file unreadable, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json errors while parsing the world document.
    #[error("world data error: {0}")]
    Json(#[from] serde_json::Error),

    /// Returned when a template referenced by name is not defined.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// The world document is structurally unusable (e.g. no start location).
    #[error("invalid world data: {0}")]
    InvalidWorld(String),
}

impl GameError {
    pub fn not_found(kind: &'static str, name: &str) -> Self {
        GameError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    /// One-line message shown to the player when an action aborts on a data problem.
    pub fn player_message(&self) -> String {
        match self {
            GameError::NotFound { kind, name } => format!(
                "Something is wrong with the world data: {} '{}' is missing.",
                kind, name
            ),
            other => format!("Something went wrong: {}", other),
        }
    }
}
