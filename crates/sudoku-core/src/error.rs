//! Board-level error taxonomy (spec §7).

/// Errors that can occur while constructing or configuring a [`Board`](crate::Board).
///
/// This is the only error variant surfaced to callers per spec §7 — every
/// other failure mode (`Infeasible`, `DeadBoard`, `Timeout`,
/// `CallbackTermination`) is encoded in a result value instead of raised.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    /// A board string had the wrong length or an invalid character, or a
    /// digit array contained a value outside 0-9.
    #[display("bad board input: {_0}")]
    BadInput(#[error(not(source))] String),
}
