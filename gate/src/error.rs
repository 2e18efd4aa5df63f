use crate::notify::Notice;
use thiserror::Error;

/// Why a join control activation did not go through
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Contest is not currently active")]
    InactiveContest,

    #[error("You have already joined this contest")]
    AlreadyJoined,

    #[error("Contest has reached its maximum number of participants")]
    ContestFull,

    #[error("Contest has ended")]
    ContestEnded,

    #[error("Failed to join contest: {0}")]
    JoinMutationFailed(String),
}

impl GateError {
    /// The user-facing notice for this error
    pub fn notice(&self) -> Notice {
        match self {
            GateError::InactiveContest => {
                Notice::error("Contest not active", "This contest is not currently active.")
            }
            GateError::AlreadyJoined => {
                Notice::error("Already joined", "You have already joined this contest.")
            }
            GateError::ContestFull => Notice::error(
                "Contest full",
                "This contest has reached its maximum number of participants.",
            ),
            GateError::ContestEnded => Notice::error("Contest ended", "This contest has ended."),
            GateError::JoinMutationFailed(message) => Notice::error("Error", message.clone()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
