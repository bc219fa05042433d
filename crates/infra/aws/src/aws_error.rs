use std::fmt::Debug;

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use shotty_core::error::Error;

pub(crate) const INSTANCE_NOT_FOUND: &str = "InvalidInstanceID.NotFound";

pub(crate) fn map_aws_error<E, R>(operation_name: &str, sdk_error: SdkError<E, R>) -> Error
where
    E: std::error::Error + Send + Sync + 'static + ProvideErrorMetadata,
    R: Debug + Send + Sync + 'static,
{
    match sdk_error {
        SdkError::ServiceError(service_error) => {
            let error = service_error.into_err();
            classify(operation_name, error.code(), error.message())
        }

        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => Error::Transient {
            operation_name: operation_name.to_string(),
            detail: DisplayErrorContext(&sdk_error).to_string(),
        },

        other => Error::Provider {
            operation_name: operation_name.to_string(),
            code: "Unknown".to_string(),
            detail: DisplayErrorContext(&other).to_string(),
        },
    }
}

fn classify(operation_name: &str, code: Option<&str>, message: Option<&str>) -> Error {
    let operation_name = operation_name.to_string();
    match code.unwrap_or_default() {
        "AuthFailure" | "UnauthorizedOperation" | "InvalidClientTokenId" => {
            Error::Authentication { operation_name }
        }
        "AccessDenied" | "AccessDeniedException" => Error::Authorization {
            operation: operation_name,
        },
        "Throttling" | "ThrottlingException" | "RequestLimitExceeded" => {
            Error::Quota { operation_name }
        }
        code => Error::Provider {
            operation_name,
            code: if code.is_empty() { "Unknown" } else { code }.to_string(),
            detail: message.unwrap_or_default().to_string(),
        },
    }
}
