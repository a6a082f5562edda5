//! Request validation and response normalization.
//!
//! Everything in here is pure: raw JSON in, canonical types (or a typed error)
//! out. Nothing in this module touches the network or the formatters.

pub mod dates;
pub mod filter;
pub mod normalize;

use thiserror::Error;

pub use filter::{validate_search_filter, SearchFilter};

/// A request parameter broke one of the declared rules. Raised before any
/// network call is made.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("fromDateTime must be before toDateTime")]
    DateOrder,

    #[error("{field} must be an ISO-8601 datetime (e.g. 2024-01-01T00:00:00Z), got \"{value}\"")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("{field} must contain only digits, got \"{value}\"")]
    NotNumeric { field: String, value: String },

    #[error("{field} must be {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("filter must be a JSON object")]
    NotAnObject,

    #[error("invalid filter JSON: {0}")]
    Json(String),

    #[error(
        "unknown relative date \"{0}\" (expected today, yesterday, this-week, last-week, this-month or last-month)"
    )]
    UnknownRelativeDate(String),
}
