//! Serializable verification outcome

use serde::{Deserialize, Serialize};

use crate::grammar::GrammarSource;
use crate::verify::{LanguageHandle, LoadFailure};

/// Outcome of one verification, in the shape returned by the `verify_grammar`
/// tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub grammar: String,
    pub source: String,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi_version: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_kind_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyReport {
    pub fn passed(handle: &LanguageHandle, source: &GrammarSource) -> Self {
        Self {
            grammar: handle.grammar().to_string(),
            source: source.to_string(),
            ok: true,
            abi_version: Some(handle.abi_version()),
            node_kind_count: Some(handle.node_kind_count()),
            field_count: Some(handle.field_count()),
            error: None,
        }
    }

    pub fn failed(grammar: &str, source: &GrammarSource, failure: &LoadFailure) -> Self {
        Self {
            grammar: grammar.to_string(),
            source: source.to_string(),
            ok: false,
            abi_version: None,
            node_kind_count: None,
            field_count: None,
            error: Some(failure.to_string()),
        }
    }
}
