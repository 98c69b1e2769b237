//! The generated reflection.
//!
//! Opaque to the poller; only the front end reads its fields.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub title: String,
    pub introduction: String,
    pub problem_statement: String,
    pub sutra_quote: Quotation,
    pub modern_example: String,
    pub conclusion: String,
}

/// A quoted passage and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    pub text: String,
    pub source: String,
}
