//! Errors raised while turning input into dial state.
//!
//! None of these are fatal: the dial absorbs them by falling back to an empty
//! layout or a ring without an active item.

use crate::common::RingKind;
use std::error;
use std::fmt;

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// The timestamp text was empty or could not be parsed.
    InvalidTimestamp { input: String, reason: String },
    /// A ring was asked for a layout with no items.
    DegenerateRing { ring: Option<RingKind> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimestamp { input, reason } => {
                write!(f, "\"{input}\" is not a valid timestamp: {reason}")
            }
            Self::DegenerateRing { ring: Some(ring) } => {
                write!(f, "{ring} ring has no items to lay out")
            }
            Self::DegenerateRing { ring: None } => write!(f, "ring has no items to lay out"),
        }
    }
}

impl error::Error for Error {}
