use thiserror::Error;

/// Everything that can go wrong between pressing Enter and seeing an answer.
///
/// `EmptyInput` and `Busy` are rejections of the submit itself and never reach
/// the user. The other variants end up in the error banner via `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("question is empty")]
    EmptyInput,

    #[error("a request is already in flight")]
    Busy,

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Server returned status {status}")]
    MalformedResponse { status: u16 },

    #[error("{0}")]
    Transport(String),
}

impl ChatError {
    /// HTTP status of the response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Http { status, .. } | ChatError::MalformedResponse { status } => Some(*status),
            _ => None,
        }
    }
}
