//! Error-tolerance policy
//!
//! An [`ErrorsLevelMask`] holds one bit per tolerable [`ErrorKind`]. A set
//! bit makes the engine omit the failing output key instead of aborting the
//! conversion. Filter-not-found and filter errors have no bit: they are
//! configuration defects and always abort.
//!
//! Copyright (c) 2025 Schemator Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, ErrorKind, Result};
use std::fmt;
use std::str::FromStr;

/// Bitmask of tolerated error categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ErrorsLevelMask(u8);

impl ErrorsLevelMask {
    const VALID_BITS: u8 = (1 << 3) | (1 << 4) | (1 << 5) | (1 << 6);

    /// Strict mask, nothing tolerated
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Mask tolerating every tolerable category
    pub const fn all() -> Self {
        Self(Self::VALID_BITS)
    }

    fn bit(kind: ErrorKind) -> u8 {
        if kind.is_tolerable() {
            1 << kind.code()
        } else {
            0
        }
    }

    /// Build a mask from raw bits, dropping bits of non-tolerable or unknown categories
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::VALID_BITS)
    }

    /// Raw bits, bit `n` standing for the category with code `n`
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build a mask from a list of categories
    pub fn from_kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ErrorKind>,
    {
        kinds.into_iter().fold(Self::empty(), Self::with)
    }

    /// Return a copy that also tolerates `kind`
    pub fn with(self, kind: ErrorKind) -> Self {
        Self(self.0 | Self::bit(kind))
    }

    /// Return a copy that no longer tolerates `kind`
    pub fn without(self, kind: ErrorKind) -> Self {
        Self(self.0 & !Self::bit(kind))
    }

    /// Tolerate `kind` from now on
    pub fn insert(&mut self, kind: ErrorKind) {
        *self = self.with(kind);
    }

    /// Stop tolerating `kind`
    pub fn remove(&mut self, kind: ErrorKind) {
        *self = self.without(kind);
    }

    /// Whether `kind` is tolerated
    pub fn contains(self, kind: ErrorKind) -> bool {
        let bit = Self::bit(kind);
        bit != 0 && self.0 & bit == bit
    }

    /// Whether the mask has no bits set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `error` should be suppressed rather than propagated
    pub fn tolerates(self, error: &Error) -> bool {
        error.kind().is_some_and(|kind| self.contains(kind))
    }

    /// Tolerated categories in code order
    pub fn kinds(self) -> Vec<ErrorKind> {
        ErrorKind::TOLERABLE
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

impl FromIterator<ErrorKind> for ErrorsLevelMask {
    fn from_iter<I: IntoIterator<Item = ErrorKind>>(iter: I) -> Self {
        Self::from_kinds(iter)
    }
}

impl fmt::Display for ErrorsLevelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = self.kinds().into_iter().map(ErrorKind::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// Parses `none`, `all`, or a comma separated list of category names.
///
/// Naming a category that can never be tolerated is rejected so that a
/// configuration cannot silently appear to relax filter errors.
impl FromStr for ErrorsLevelMask {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "" | "none" => return Ok(Self::empty()),
            "all" => return Ok(Self::all()),
            _ => {}
        }

        let mut mask = Self::empty();
        for name in s.split(',') {
            let kind: ErrorKind = name.parse()?;
            if !kind.is_tolerable() {
                return Err(Error::configuration(format!(
                    "error category '{}' cannot be tolerated",
                    kind
                )));
            }
            mask.insert(kind);
        }
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_strict() {
        let mask = ErrorsLevelMask::default();
        assert!(mask.is_empty());
        for kind in ErrorKind::ALL {
            assert!(!mask.contains(kind));
        }
    }

    #[test]
    fn test_bits_are_independent() {
        let mask = ErrorsLevelMask::empty()
            .with(ErrorKind::CannotGetValue)
            .with(ErrorKind::UnsupportedKeyType);
        assert!(mask.contains(ErrorKind::CannotGetValue));
        assert!(mask.contains(ErrorKind::UnsupportedKeyType));
        assert!(!mask.contains(ErrorKind::UnsupportedSourceType));

        let mask = mask.without(ErrorKind::CannotGetValue);
        assert!(!mask.contains(ErrorKind::CannotGetValue));
        assert!(mask.contains(ErrorKind::UnsupportedKeyType));
    }

    #[test]
    fn test_bit_positions_follow_codes() {
        let mask = ErrorsLevelMask::empty().with(ErrorKind::CannotGetValue);
        assert_eq!(mask.bits(), 1 << 3);
        assert_eq!(ErrorsLevelMask::from_bits_truncate(0xff), ErrorsLevelMask::all());
    }

    #[test]
    fn test_non_tolerable_kinds_are_ignored() {
        let mask = ErrorsLevelMask::all()
            .with(ErrorKind::FilterNotFound)
            .with(ErrorKind::FilterError);
        assert_eq!(mask, ErrorsLevelMask::all());
        assert!(!mask.contains(ErrorKind::FilterNotFound));
        assert!(!mask.tolerates(&Error::FilterNotFound {
            filter: "x".to_string()
        }));
    }

    #[test]
    fn test_tolerates_error() {
        let mask = ErrorsLevelMask::empty().with(ErrorKind::CannotGetValue);
        assert!(mask.tolerates(&Error::cannot_get_value(&json!({}), "a")));
        assert!(!mask.tolerates(&Error::unsupported_source_type(&json!(1), "a")));
        assert!(!mask.tolerates(&Error::configuration("bad")));
    }

    #[test]
    fn test_parse() {
        assert_eq!("none".parse::<ErrorsLevelMask>().unwrap(), ErrorsLevelMask::empty());
        assert_eq!("all".parse::<ErrorsLevelMask>().unwrap(), ErrorsLevelMask::all());

        let mask: ErrorsLevelMask = "cannot-get-value, unsupported-source-type".parse().unwrap();
        assert_eq!(
            mask.kinds(),
            vec![ErrorKind::CannotGetValue, ErrorKind::UnsupportedSourceType]
        );
        assert_eq!(mask.to_string(), "cannot-get-value,unsupported-source-type");

        assert!("filter-error".parse::<ErrorsLevelMask>().is_err());
        assert!("bogus".parse::<ErrorsLevelMask>().is_err());
    }
}
