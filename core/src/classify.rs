//! Status-code classification for zone record responses.
//!
//! Each operation has exactly one success status. A `200` answer to a create
//! is as much a failure as a `500`: the service's contract ties the operation
//! to `201`, and anything else means the write did not happen as requested.

use tracing::{debug, warn};

use crate::error::{ApiError, RemoteError};
use crate::http::HttpResponse;
use crate::types::Operation;

/// Map the response of a mutating call to success or `ApiError::Remote`.
pub fn classify(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    expect_status(response, operation.expected_status()).inspect_err(|err| {
        warn!(operation = operation.name(), error = %err, "record set write failed");
    })
}

/// Reads succeed only on `200`. A miss is routine for existence checks, so
/// it is logged at debug level.
pub fn expect_read_status(response: &HttpResponse) -> Result<(), ApiError> {
    expect_status(response, 200).inspect_err(|err| {
        debug!(error = %err, "record set read failed");
    })
}

/// Fail with `ApiError::Remote` unless `response.status == expected`.
pub fn expect_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(RemoteError::new(response.status, response.body.clone()).into())
}
