//! crates/wa_core/src/ids.rs
//! Category names and digest identifiers; no I/O.
//!
//! A category name is any non-empty UTF-8 string: names are opaque labels and
//! only need to be unique within a declaration (checked by the callers).

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned when validating or parsing IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdError {
    Empty,
    BadShape,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdError::Empty => f.write_str("id must not be empty"),
            IdError::BadShape => f.write_str("id has invalid shape"),
        }
    }
}

impl std::error::Error for IdError {}

const HEX64_LEN: usize = 64;

/// Lowercase hex (length must be exactly 64).
#[inline]
pub fn is_valid_sha256(s: &str) -> bool {
    s.len() == HEX64_LEN
        && s.as_bytes()
            .iter()
            .all(|&b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

macro_rules! simple_string_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            #[inline] pub fn as_str(&self) -> &str { &self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: &str) -> Result<Self, Self::Error> { value.parse() }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;
            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
        }

        impl From<$name> for String {
            #[inline]
            fn from(value: $name) -> String { value.0 }
        }

        impl AsRef<str> for $name {
            #[inline]
            fn as_ref(&self) -> &str { &self.0 }
        }
    }
}

simple_string_newtype!(
    /// Category name. Ordering is byte-lexicographic (code-point order for UTF-8),
    /// which is the canonical order every algorithm in the workspace iterates in.
    CategoryId
);

simple_string_newtype!(
    /// 64-hex lowercase SHA-256 digest.
    Sha256
);

impl FromStr for CategoryId {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() { return Err(IdError::Empty); }
        Ok(CategoryId(s.to_owned()))
    }
}

impl FromStr for Sha256 {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_sha256(s) { return Err(IdError::BadShape); }
        Ok(Sha256(s.to_owned()))
    }
}

impl Sha256 {
    #[inline] pub fn as_hex(&self) -> &str { &self.0 }
}

// === Tests ===
