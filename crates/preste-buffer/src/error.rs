//! Erreurs communes du substrat buffer.

use std::borrow::Cow;

use thiserror::Error;

/// Alias résultat commun au crate.
pub type BufferResult<T> = core::result::Result<T, BufferError>;

/// Errors surfaced by checked buffer operations.
///
/// Every error is returned synchronously to the caller; nothing is logged or
/// swallowed. The `*_unchecked` access paths never produce errors and may
/// corrupt memory when their preconditions are violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// An index/length combination falls outside `[0, size)`.
    #[error("out of bounds: index={index}, need={need}, size={size}")]
    OutOfBounds {
        /// Offending byte index.
        index: usize,
        /// Number of bytes the operation required at `index`.
        need: usize,
        /// Logical size of the buffer at the time of the access.
        size: usize,
    },

    /// Invalid construction argument, address overflow or malformed encoding.
    #[error("invalid argument: {0}")]
    InvalidArgument(Cow<'static, str>),

    /// Operation unsupported by the current storage mode.
    #[error("illegal state: {0}")]
    IllegalState(Cow<'static, str>),

    /// A region transfer target is too small.
    #[error("target overflow: need {need} bytes, {remaining} available")]
    Overflow {
        /// Bytes the transfer required.
        need: usize,
        /// Bytes actually available in the target.
        remaining: usize,
    },

    /// A region transfer source holds fewer bytes than requested.
    #[error("source underflow: need {need} bytes, {remaining} available")]
    Underflow {
        /// Bytes the transfer required.
        need: usize,
        /// Bytes actually available in the source.
        remaining: usize,
    },

    /// Write attempted through a read-only native region.
    #[error("write into read-only region")]
    ReadOnly,
}

impl BufferError {
    /// Construit une erreur « argument invalide ».
    pub fn invalid_argument(msg: impl Into<Cow<'static, str>>) -> Self {
        BufferError::InvalidArgument(msg.into())
    }

    /// Construit une erreur « état illégal ».
    pub fn illegal_state(msg: impl Into<Cow<'static, str>>) -> Self {
        BufferError::IllegalState(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn out_of_bounds_message_is_diagnosable() {
        let err = BufferError::OutOfBounds { index: 7, need: 4, size: 9 };
        assert_eq!(err.to_string(), "out of bounds: index=7, need=4, size=9");
    }

    #[test]
    fn helper_constructors() {
        assert_eq!(
            BufferError::invalid_argument("negative length").to_string(),
            "invalid argument: negative length"
        );
        assert_eq!(
            BufferError::illegal_state("no backing array").to_string(),
            "illegal state: no backing array"
        );
    }
}
