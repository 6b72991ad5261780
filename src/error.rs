use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Caller identity response did not include an account id")]
    MissingCallerAccount,
}
