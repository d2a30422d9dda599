use store::{RemoteError, ValidationError};
use thiserror::Error;

use crate::session::AuthError;

/// Any failure an operation can surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
