//! Application actions.
//!
//! Every storage call is wrapped here: failures are logged and turned into
//! a [`AppError::StorageFailure`] carrying a user-facing message, and the
//! listing actions degrade to an empty result instead.

pub mod events;
pub mod registrations;
pub mod uploads;

use crate::utils::error::AppError;

/// Caller mistakes pass through untouched; storage faults are logged and
/// replaced by `message`.
pub(crate) fn storage_failure(message: &str, err: AppError) -> AppError {
    if !err.is_storage_failure() {
        return err;
    }
    tracing::error!(error = ?err, "{message}");
    AppError::StorageFailure(message.to_string())
}
