//! Membership checks shared by every pair-scoped service.

use crate::domain::ports::{PairDirectory, PairDirectoryError};
use crate::domain::{Error, PairActor, PairMembership};

/// Map directory failures onto domain errors.
///
/// Missing and incomplete pairs are both `not_found`; a stranger is
/// `forbidden`.
pub fn map_directory_error(error: PairDirectoryError) -> Error {
    match error {
        PairDirectoryError::PairNotFound => Error::not_found("pair not found"),
        PairDirectoryError::PairIncomplete => Error::not_found("pair is not complete yet"),
        PairDirectoryError::NotMember => Error::forbidden("you are not a member of this pair"),
        PairDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("pair directory unavailable: {message}"))
        }
        PairDirectoryError::Query { message } => {
            Error::internal(format!("pair directory error: {message}"))
        }
    }
}

/// Resolve `actor` into a complete membership or fail before any state is read.
pub async fn resolve_membership(
    directory: &dyn PairDirectory,
    actor: &PairActor,
) -> Result<PairMembership, Error> {
    directory
        .membership(&actor.pair_id, &actor.user_id)
        .await
        .map_err(map_directory_error)
}
