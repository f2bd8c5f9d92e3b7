use thiserror::Error;
use super::store::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    // The only business-rule failure: the mobile exists but the PIN differs.
    // An unseen mobile registers instead of failing.
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
