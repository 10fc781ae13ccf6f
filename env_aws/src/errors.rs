use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use env_defs::RemoteError;

/// Sorts an SDK failure into what the service said, what never reached it,
/// and everything else. Both SDK crates share the same `SdkError` type.
pub(crate) fn remote_error<E, R>(error: SdkError<E, R>) -> RemoteError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    match &error {
        SdkError::ServiceError(service) => {
            let err = service.err();
            RemoteError::Service {
                code: err.code().unwrap_or("Unknown").to_string(),
                message: err.message().unwrap_or_default().to_string(),
            }
        }
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) | SdkError::ResponseError(_) => {
            RemoteError::Transport(DisplayErrorContext(&error).to_string())
        }
        _ => RemoteError::Unhandled(anyhow::Error::new(error)),
    }
}
