use std::fmt;

/// The single fallible operation this crate exposes: restoring a [`crate::Z80`]
/// from a previously captured [`crate::Z80State`].
///
/// `step` itself is infallible — an unmapped opcode is a diagnostic, not an
/// error (see the crate-level docs and `Z80::step`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreError {
    /// The interrupt mode field did not decode to 0, 1 or 2.
    InvalidInterruptMode(u8),
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::InvalidInterruptMode(im) => {
                write!(f, "invalid interrupt mode {im} in snapshot, expected 0, 1 or 2")
            }
        }
    }
}

impl std::error::Error for RestoreError {}
