//! Parsing error types
//!
//! Errors here are the unrecoverable kind: a required element is missing or
//! a value violates an assumed shape. Optional-field absence never produces
//! an error; parsers map it to `None` directly.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("required field '{field}' not found in {context}")]
    RequiredFieldMissing { field: String, context: String },

    #[error("invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("unknown gender label '{label}' in {context}")]
    UnknownGender { label: String, context: String },

    #[error("unknown crew role '{role}' in {context}")]
    UnknownRole { role: String, context: String },

    #[error("malformed credit entry at index {index} in {context}: {reason}")]
    MalformedCredit {
        index: usize,
        reason: String,
        context: String,
    },

    #[error("malformed value '{value}' for field '{field}' in {context}")]
    MalformedValue {
        field: String,
        value: String,
        context: String,
    },

    #[error("no items found on listing page {context}")]
    NoItemsFound { context: String },
}

impl ParsingError {
    pub fn required_field_missing(field: &str, context: &str) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_credit(index: usize, reason: &str, context: &str) -> Self {
        Self::MalformedCredit {
            index,
            reason: reason.to_string(),
            context: context.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
