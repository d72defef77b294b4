//! Shared response handling for the blocking clients.

use subwatch_core::ApiError;

/// Map a non-success response into an [`ApiError::Status`], keeping the
/// body as the diagnostic detail.
pub(crate) fn expect_success(
    operation: &'static str,
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            operation,
            status: status.as_u16(),
            detail: response.text().unwrap_or_default(),
        })
    }
}
