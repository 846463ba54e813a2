#![allow(dead_code)]

//! Shared helpers for integration tests

use scribl_grammar_verifier::grammar::dynamic::library_file_name;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to extract text from CallToolResult
pub fn get_result_text(result: &scribl_grammar_verifier::mcp_types::CallToolResult) -> String {
    // Round-trip the first content block through JSON to read its text field
    if let Some(first_content) = result.content.first() {
        let json_str = serde_json::to_string(first_content).unwrap();
        let json_val: serde_json::Value = serde_json::from_str(&json_str).unwrap();
        json_val["text"].as_str().unwrap().to_string()
    } else {
        panic!("No content in result");
    }
}

/// A search directory holding a file named like the library for `name`
/// whose contents are not a loadable library
pub fn corrupt_library_dir(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(library_file_name(name));
    fs::write(&path, b"this is not a shared object").unwrap();
    (dir, path)
}

pub fn assert_error_contains(err: &str, expected: &str, context: &str) {
    assert!(
        err.to_lowercase().contains(&expected.to_lowercase()),
        "{}: Error should contain '{}', got: {}",
        context,
        expected,
        err
    );
}
