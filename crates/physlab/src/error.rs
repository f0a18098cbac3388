//! Error types for the simulation core.

use crate::param::ParamError;

/// Errors surfaced by the simulation core.
///
/// Steppers themselves are infallible; errors only arise at the boundary
/// where names and values come in from the outside (tab names, parameter
/// writes).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A simulation name that is not one of the six kinds.
    #[error(
        "unknown simulation `{0}` (expected one of: projectile, pendulum, spring, wave, fluid, orbit)"
    )]
    UnknownKind(String),

    /// A rejected parameter write.
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// A specialized [`Result`] type for the simulation core.
pub type Result<T> = std::result::Result<T, Error>;
