//! Mapping of SDK failures onto the audit error taxonomy.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Error codes EC2 returns for images that are gone or hidden from the
/// caller. Deleted images may also come back as an empty result instead.
const IMAGE_NOT_FOUND_CODES: &[&str] = &[
    "InvalidAMIID.NotFound",
    "InvalidAMIID.Unavailable",
    "InvalidAMIID.Malformed",
];

/// Error codes meaning the credentials themselves were rejected.
const AUTH_FAILURE_CODES: &[&str] = &[
    "AuthFailure",
    "InvalidClientTokenId",
    "UnrecognizedClientException",
    "ExpiredToken",
    "ExpiredTokenException",
    "SignatureDoesNotMatch",
    "AccessDenied",
];

pub(crate) fn is_image_not_found(code: Option<&str>) -> bool {
    code.is_some_and(|c| IMAGE_NOT_FOUND_CODES.contains(&c))
}

pub(crate) fn is_auth_failure(code: Option<&str>) -> bool {
    code.is_some_and(|c| AUTH_FAILURE_CODES.contains(&c))
}

/// One-line description: `Code: message` when the service supplied them,
/// otherwise the full error chain.
pub(crate) fn describe<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_not_found_codes() {
        assert!(is_image_not_found(Some("InvalidAMIID.NotFound")));
        assert!(is_image_not_found(Some("InvalidAMIID.Unavailable")));
        assert!(!is_image_not_found(Some("RequestLimitExceeded")));
        assert!(!is_image_not_found(None));
    }

    #[test]
    fn auth_failure_codes() {
        assert!(is_auth_failure(Some("ExpiredToken")));
        assert!(is_auth_failure(Some("AuthFailure")));
        assert!(!is_auth_failure(Some("InvalidAMIID.NotFound")));
        assert!(!is_auth_failure(None));
    }
}
