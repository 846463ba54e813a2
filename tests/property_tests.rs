//! Property-based tests for the grammar verifier
//!
//! These tests verify invariants that should hold for all inputs,
//! not just specific test cases.

use proptest::prelude::*;
use scribl_grammar_verifier::config::Config;
use scribl_grammar_verifier::grammar::dynamic::{entry_symbol, grammar_name_from_file, library_file_name, SearchLoader};
use scribl_grammar_verifier::grammar::Grammar;
use scribl_grammar_verifier::verify::{GrammarVerifier, LoadFailure};
use serde_json::json;

proptest! {
    /// Property: a grammar with no library on disk always fails with
    /// ArtifactMissing, and the diagnostic names the grammar
    #[test]
    fn test_missing_library_always_fails_cleanly(name in "[a-z][a-z0-9_]{0,20}") {
        let dir = tempfile::TempDir::new().unwrap();
        let loader = SearchLoader::new(name.clone(), vec![dir.path().to_path_buf()]);

        let err = GrammarVerifier::new(name.clone(), loader).verify_load().unwrap_err();

        let is_missing = matches!(err, LoadFailure::ArtifactMissing { .. });
        prop_assert!(is_missing);
        let expected_prefix = format!("Error loading {} grammar", name);
        prop_assert!(err.to_string().starts_with(&expected_prefix));
    }

    /// Property: library file names decode back to the grammar name
    #[test]
    fn test_library_file_name_round_trips(name in "[a-z][a-z0-9_-]{0,20}") {
        let file = library_file_name(&name);
        prop_assert_eq!(grammar_name_from_file(&file), Some(name.as_str()));
        prop_assert!(!entry_symbol(&name).contains('-'));
    }

    /// Property: the verify_grammar executor accepts exactly the catalogue
    /// ids and rejects everything else with an actionable message
    #[test]
    fn test_verify_tool_accepts_only_catalogue_ids(id in "\\PC{0,30}") {
        let config = Config::with_search_paths(Vec::new());
        let result = scribl_grammar_verifier::inspect::verify_grammar::report(
            &json!({ "grammar": id }),
            &config,
        );

        match Grammar::from_id(&id) {
            Ok(grammar) => {
                let report = result.unwrap();
                prop_assert!(report.ok);
                prop_assert_eq!(report.grammar, grammar.name());
            }
            Err(_) => {
                let err = result.unwrap_err().to_string();
                let actionable = err.contains("Unknown compiled-in grammar")
                    || err.contains("Empty grammar identifier");
                prop_assert!(actionable, "unexpected error: {}", err);
            }
        }
    }

    /// Property: lookup succeeds exactly for catalogue ids, in any case
    #[test]
    fn test_lookup_is_case_insensitive(index in 0..Grammar::ALL.len(), upper in any::<bool>()) {
        let grammar = Grammar::ALL[index];
        let id = if upper { grammar.id().to_uppercase() } else { grammar.id().to_string() };
        prop_assert_eq!(Grammar::from_id(&id).unwrap(), grammar);
    }
}
