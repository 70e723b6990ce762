use std::{io, num::ParseIntError, string::String};

/// Failures reported by [`Shell`](crate::Shell) and [`Config`](crate::Config).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not an integer.
    #[error("{input:?} is not a number")]
    Parse {
        input: String,
        #[source]
        source: ParseIntError,
    },

    /// The key lies outside the accepted domain.
    #[error("{value} is outside the accepted range {min}-{max}")]
    OutOfRange { value: i32, min: i32, max: i32 },

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    /// The configured key domain is empty.
    #[error("the key range {min}-{max} is empty")]
    EmptyRange { min: i32, max: i32 },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Check whether this error was caused by a malformed or out-of-domain
    /// key. Such errors leave the tree unchanged and are never fatal.
    #[inline]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::OutOfRange { .. })
    }
}
