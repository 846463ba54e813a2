//! The Scribl grammar artifact
//!
//! Scribl ships as a compiled tree-sitter library named
//! `libtree-sitter-scribl` exporting `tree_sitter_scribl`. Nothing here knows
//! how the grammar is defined; the profile only lists names the grammar is
//! known to declare.

use super::dynamic::SearchLoader;
use super::profile::{GrammarProfile, Sample};
use crate::config::Config;
use crate::verify::GrammarVerifier;

/// Grammar name as used in file and symbol names
pub const NAME: &str = "scribl";

/// Name used in diagnostics
pub const DISPLAY_NAME: &str = "Scribl";

/// Visible node kinds declared by the Scribl grammar
pub const NODE_KINDS: &[&str] = &[
    "block",
    "statement",
    "identifier",
    "number",
    "string",
    "template_string",
    "template_variable",
    "iterator",
    "function",
    "call_expression",
    "member_expression",
    "subscript_expression",
    "unary_expression",
    "binary_expression",
    "assignment_expression",
    "comment",
];

/// Field names declared by the Scribl grammar
pub const FIELDS: &[&str] = &["left", "right", "operator", "argument"];

/// Smallest complete Scribl program: one assignment statement
pub const SAMPLE: Sample = Sample {
    source: "x = 1;\n",
    root_kind: "block",
};

pub fn profile() -> GrammarProfile {
    GrammarProfile {
        node_kinds: NODE_KINDS.to_vec(),
        fields: FIELDS.to_vec(),
        sample: Some(SAMPLE),
    }
}

/// Loader resolving the Scribl library from the configured search paths
pub fn loader(config: &Config) -> SearchLoader {
    SearchLoader::new(NAME, config.search_paths.clone())
}

/// Verifier for the Scribl grammar with its full profile attached
pub fn verifier(config: &Config) -> GrammarVerifier<SearchLoader> {
    GrammarVerifier::new(DISPLAY_NAME, loader(config)).with_profile(profile())
}
