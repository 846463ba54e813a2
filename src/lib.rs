//! Verifies that compiled tree-sitter grammars load into usable language
//! handles.
//!
//! The core entry point is [`verify::GrammarVerifier`], built around an
//! injected [`grammar::GrammarLoader`]. The Scribl grammar is resolved from
//! disk through [`grammar::scribl`]; the grammars in [`grammar::Grammar`] are
//! linked into the binary.

pub mod config;
pub mod grammar;
pub mod inspect;
pub mod mcp_types;
pub mod report;
pub mod verify;
