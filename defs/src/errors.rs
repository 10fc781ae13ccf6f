use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Failed to delete the stack: {stack_name}, {msg}")]
    DeleteFailed { stack_name: String, msg: String },

    #[error("Failed to delete artifacts in bucket {bucket}: {msg} (keys: {})", .keys.join(", "))]
    ArtifactDeleteFailed {
        bucket: String,
        keys: Vec<String>,
        msg: String,
    },

    #[error("No stack name was provided, pass --stack-name or set stack_name in the config file")]
    MissingStackName,

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

/// Error returned by a remote capability (stack service, object store).
/// The split mirrors what the caller can reason about: a service answered
/// with an error, the request never got an answer, or something unknown.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl RemoteError {
    pub fn service(code: &str, message: &str) -> Self {
        RemoteError::Service {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            RemoteError::Service { code, .. } => {
                matches!(code.as_str(), "NoSuchKey" | "NotFound" | "404")
            }
            _ => false,
        }
    }
}
