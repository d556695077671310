use thiserror::Error;

/// Interpose engine errors.
///
/// Lookup misses are deliberately not represented here: an unknown token,
/// class, method, or key is an expected "no result" answer and is surfaced
/// as `None` by the query operations, never as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// A module with this name was already registered. Surfaced to the
    /// bootstrap loader, which decides whether to abort startup.
    #[error("Duplicate module registration: {}", _0)]
    DuplicateModule(String),

    #[error("Invalid argument: {}", _0)]
    InvalidArgument(&'static str),
}
