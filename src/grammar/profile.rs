//! Structural expectations for a loaded grammar
//!
//! A non-null handle only proves the loader returned *something*. A profile
//! pins down a few node kinds, fields and a tiny sample parse so an artifact
//! built from the wrong grammar, or a truncated table, is caught too.

use tree_sitter::{Language, Parser};

use crate::verify::LoadFailure;

/// A snippet the grammar must parse into a tree rooted at `root_kind`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub source: &'static str,
    pub root_kind: &'static str,
}

/// Named node kinds and fields that must resolve to non-zero ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarProfile {
    pub node_kinds: Vec<&'static str>,
    pub fields: Vec<&'static str>,
    pub sample: Option<Sample>,
}

impl GrammarProfile {
    /// Check `language` against the profile
    ///
    /// `parser` must already be configured with `language`.
    pub fn check(
        &self,
        grammar: &str,
        language: &Language,
        parser: &mut Parser,
    ) -> Result<(), LoadFailure> {
        // Symbol id 0 is the builtin end symbol, so it doubles as "not found".
        if let Some(kind) = self
            .node_kinds
            .iter()
            .find(|kind| language.id_for_node_kind(kind, true) == 0)
        {
            return Err(LoadFailure::MissingNodeKind {
                grammar: grammar.to_string(),
                kind: kind.to_string(),
            });
        }

        if let Some(field) = self
            .fields
            .iter()
            .find(|field| language.field_id_for_name(field).is_none())
        {
            return Err(LoadFailure::MissingField {
                grammar: grammar.to_string(),
                field: field.to_string(),
            });
        }

        if let Some(sample) = &self.sample {
            let found = parser
                .parse(sample.source, None)
                .map(|tree| tree.root_node().kind().to_string())
                .unwrap_or_else(|| "<no tree>".to_string());

            log::debug!("{grammar} sample parsed to root `{found}`");

            if found != sample.root_kind {
                return Err(LoadFailure::SampleMismatch {
                    grammar: grammar.to_string(),
                    expected: sample.root_kind.to_string(),
                    found,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rust_parser() -> (Language, Parser) {
        let language: Language = tree_sitter_rust::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).unwrap();
        (language, parser)
    }

    #[test]
    fn empty_profile_accepts_any_language() {
        let (language, mut parser) = rust_parser();
        assert!(GrammarProfile::default()
            .check("Rust", &language, &mut parser)
            .is_ok());
    }

    #[test]
    fn reports_first_missing_node_kind() {
        let (language, mut parser) = rust_parser();
        let profile = GrammarProfile {
            node_kinds: vec!["function_item", "template_string"],
            ..Default::default()
        };

        let err = profile.check("Rust", &language, &mut parser).unwrap_err();
        assert_eq!(
            err,
            LoadFailure::MissingNodeKind {
                grammar: "Rust".to_string(),
                kind: "template_string".to_string(),
            }
        );
    }

    #[test]
    fn reports_missing_field() {
        let (language, mut parser) = rust_parser();
        let profile = GrammarProfile {
            fields: vec!["name", "no_such_field"],
            ..Default::default()
        };

        let err = profile.check("Rust", &language, &mut parser).unwrap_err();
        assert!(matches!(err, LoadFailure::MissingField { ref field, .. } if field == "no_such_field"));
    }

    #[test]
    fn sample_root_kind_must_match() {
        let (language, mut parser) = rust_parser();
        let profile = GrammarProfile {
            sample: Some(Sample {
                source: "fn main() {}",
                root_kind: "block",
            }),
            ..Default::default()
        };

        let err = profile.check("Rust", &language, &mut parser).unwrap_err();
        assert_eq!(
            err,
            LoadFailure::SampleMismatch {
                grammar: "Rust".to_string(),
                expected: "block".to_string(),
                found: "source_file".to_string(),
            }
        );
    }
}
