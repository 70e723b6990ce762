//! Settings for [`Shell`](crate::Shell).
use std::path::PathBuf;

use crate::Error;

/// Settings for [`Shell`](crate::Shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The smallest key accepted from the console (inclusive).
    pub min_key: i32,
    /// The largest key accepted from the console (inclusive).
    pub max_key: i32,
    /// The file read by the `READ` command.
    pub numbers_path: PathBuf,
    /// The number of spaces per tree level used by the `PRINT` command.
    pub indent: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_key: 1,
            max_key: 999,
            numbers_path: PathBuf::from("numbers.txt"),
            indent: 10,
        }
    }
}

impl Config {
    /// Construct a `Config` accepting keys in `min..=max`. The other settings
    /// take their default values.
    pub fn new(min_key: i32, max_key: i32) -> Result<Self, Error> {
        if min_key > max_key {
            return Err(Error::EmptyRange {
                min: min_key,
                max: max_key,
            });
        }
        Ok(Self {
            min_key,
            max_key,
            ..Self::default()
        })
    }

    /// Return `value` if it's inside the accepted domain.
    pub fn check_key(&self, value: i32) -> Result<i32, Error> {
        if (self.min_key..=self.max_key).contains(&value) {
            Ok(value)
        } else {
            Err(Error::OutOfRange {
                value,
                min: self.min_key,
                max: self.max_key,
            })
        }
    }

    /// Parse a console line as a key and check its domain.
    pub fn parse_key(&self, input: &str) -> Result<i32, Error> {
        self.check_key(parse_value(input)?)
    }
}

/// Parse a console line as an integer.
pub(crate) fn parse_value(input: &str) -> Result<i32, Error> {
    let input = input.trim();
    input.parse().map_err(|source| Error::Parse {
        input: input.into(),
        source,
    })
}
