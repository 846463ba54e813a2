//! Grammar catalogue and artifact loaders
//!
//! Grammars come from two places: `tree-sitter-*` crates compiled into this
//! binary, and shared libraries built by the tree-sitter toolchain that are
//! found on disk at runtime (see [`dynamic`]). The Scribl grammar is always of
//! the second kind (see [`scribl`]).

pub mod dynamic;
pub mod profile;
pub mod scribl;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use eyre::{bail, Result};
use libloading::Library;
use tree_sitter_language::LanguageFn;

use crate::verify::LoadFailure;
use profile::{GrammarProfile, Sample};

/// Grammars compiled into the binary
///
/// Each variant is backed by a `tree-sitter-*` crate whose generated parser
/// tables are linked statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// Rust programming language
    Rust,
    /// Python programming language
    Python,
    /// JavaScript
    JavaScript,
    /// TypeScript
    TypeScript,
    /// HTML markup
    Html,
    /// CSS stylesheets
    Css,
    /// Swift programming language
    Swift,
    /// C# programming language
    CSharp,
    /// Java programming language
    Java,
    /// Go programming language
    Go,
    /// Kotlin programming language
    Kotlin,
}

impl Grammar {
    /// Every compiled-in grammar, in catalogue order
    pub const ALL: [Grammar; 11] = [
        Grammar::Rust,
        Grammar::Python,
        Grammar::JavaScript,
        Grammar::TypeScript,
        Grammar::Html,
        Grammar::Css,
        Grammar::Swift,
        Grammar::CSharp,
        Grammar::Java,
        Grammar::Go,
        Grammar::Kotlin,
    ];

    /// Get a human-readable name for the grammar
    pub fn name(&self) -> &'static str {
        match self {
            Grammar::Rust => "Rust",
            Grammar::Python => "Python",
            Grammar::JavaScript => "JavaScript",
            Grammar::TypeScript => "TypeScript",
            Grammar::Html => "HTML",
            Grammar::Css => "CSS",
            Grammar::Swift => "Swift",
            Grammar::CSharp => "C#",
            Grammar::Java => "Java",
            Grammar::Go => "Go",
            Grammar::Kotlin => "Kotlin",
        }
    }

    /// Lower-case identifier used in tool arguments and reports
    pub fn id(&self) -> &'static str {
        match self {
            Grammar::Rust => "rust",
            Grammar::Python => "python",
            Grammar::JavaScript => "javascript",
            Grammar::TypeScript => "typescript",
            Grammar::Html => "html",
            Grammar::Css => "css",
            Grammar::Swift => "swift",
            Grammar::CSharp => "c_sharp",
            Grammar::Java => "java",
            Grammar::Go => "go",
            Grammar::Kotlin => "kotlin",
        }
    }

    /// The grammar crate's loader entry point
    pub fn language_fn(&self) -> LanguageFn {
        match self {
            Grammar::Rust => tree_sitter_rust::LANGUAGE,
            Grammar::Python => tree_sitter_python::LANGUAGE,
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE,
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            Grammar::Html => tree_sitter_html::LANGUAGE,
            Grammar::Css => tree_sitter_css::LANGUAGE,
            Grammar::Swift => tree_sitter_swift::LANGUAGE,
            Grammar::CSharp => tree_sitter_c_sharp::LANGUAGE,
            Grammar::Java => tree_sitter_java::LANGUAGE,
            Grammar::Go => tree_sitter_go::LANGUAGE,
            Grammar::Kotlin => tree_sitter_kotlin_ng::LANGUAGE,
        }
    }

    /// Expectations every correct build of this grammar satisfies
    pub fn profile(&self) -> GrammarProfile {
        let (root_kind, source) = match self {
            Grammar::Rust => ("source_file", "fn main() {}\n"),
            Grammar::Python => ("module", "x = 1\n"),
            Grammar::JavaScript => ("program", "let x = 1;\n"),
            Grammar::TypeScript => ("program", "let x: number = 1;\n"),
            Grammar::Html => ("document", "<p>hi</p>\n"),
            Grammar::Css => ("stylesheet", "a { color: red; }\n"),
            Grammar::Swift => ("source_file", "let x = 1\n"),
            Grammar::CSharp => ("compilation_unit", "class A {}\n"),
            Grammar::Java => ("program", "class A {}\n"),
            Grammar::Go => ("source_file", "package main\n"),
            Grammar::Kotlin => ("source_file", "val x = 1\n"),
        };

        GrammarProfile {
            node_kinds: Vec::new(),
            fields: Vec::new(),
            sample: Some(Sample { source, root_kind }),
        }
    }

    /// Look up a compiled-in grammar by identifier or display name
    ///
    /// Matching is case-insensitive and accepts a few common aliases.
    ///
    /// # Examples
    /// ```
    /// use scribl_grammar_verifier::grammar::Grammar;
    ///
    /// assert_eq!(Grammar::from_id("rust").unwrap(), Grammar::Rust);
    /// assert_eq!(Grammar::from_id("C#").unwrap(), Grammar::CSharp);
    /// assert!(Grammar::from_id("scribl").is_err());
    /// ```
    pub fn from_id(id: &str) -> Result<Grammar> {
        let normalized = id.trim().to_lowercase();

        match normalized.as_str() {
            "rust" | "rs" => Ok(Grammar::Rust),
            "python" | "py" => Ok(Grammar::Python),
            "javascript" | "js" => Ok(Grammar::JavaScript),
            "typescript" | "ts" => Ok(Grammar::TypeScript),
            "html" => Ok(Grammar::Html),
            "css" => Ok(Grammar::Css),
            "swift" => Ok(Grammar::Swift),
            "c_sharp" | "csharp" | "c#" | "cs" => Ok(Grammar::CSharp),
            "java" => Ok(Grammar::Java),
            "go" => Ok(Grammar::Go),
            "kotlin" | "kt" => Ok(Grammar::Kotlin),
            "" => bail!("Empty grammar identifier"),
            other => bail!("Unknown compiled-in grammar: {other}"),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Where a loader obtains its grammar artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarSource {
    /// Grammar crate linked into the binary
    Builtin(Grammar),
    /// Shared library at a known path
    Library { name: String, path: PathBuf },
    /// Shared library looked up by name across search directories
    Search { name: String, paths: Vec<PathBuf> },
    /// Loader function supplied directly by the caller
    Function(String),
}

impl fmt::Display for GrammarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSource::Builtin(grammar) => write!(f, "builtin:{grammar}"),
            GrammarSource::Library { path, .. } => write!(f, "library:{}", path.display()),
            GrammarSource::Search { name, paths } => {
                write!(f, "search:{name} ({} paths)", paths.len())
            }
            GrammarSource::Function(id) => write!(f, "fn:{id}"),
        }
    }
}

/// A resolved artifact, not yet validated
///
/// `library` keeps a dynamically opened grammar mapped for as long as the
/// language function may be called.
pub struct LoadedArtifact {
    pub language_fn: LanguageFn,
    pub library: Option<Arc<Library>>,
}

/// Resolves a grammar artifact into its loader entry point
///
/// Implementations only locate and open the artifact. Validating what the
/// entry point returns is the verifier's job.
pub trait GrammarLoader {
    /// Describe where the artifact comes from
    fn source(&self) -> GrammarSource;

    /// Resolve the artifact
    ///
    /// `grammar` is the display name used in failure diagnostics.
    fn load(&self, grammar: &str) -> Result<LoadedArtifact, LoadFailure>;
}

impl GrammarLoader for Grammar {
    fn source(&self) -> GrammarSource {
        GrammarSource::Builtin(*self)
    }

    fn load(&self, _grammar: &str) -> Result<LoadedArtifact, LoadFailure> {
        Ok(LoadedArtifact {
            language_fn: self.language_fn(),
            library: None,
        })
    }
}

/// Loader wrapping an arbitrary `LanguageFn`
///
/// Useful for grammar crates outside the catalogue and for exercising the
/// verifier against hand-built entry points.
#[derive(Clone, Copy)]
pub struct FnLoader {
    id: &'static str,
    language_fn: LanguageFn,
}

impl FnLoader {
    pub fn new(id: &'static str, language_fn: LanguageFn) -> Self {
        Self { id, language_fn }
    }
}

impl GrammarLoader for FnLoader {
    fn source(&self) -> GrammarSource {
        GrammarSource::Function(self.id.to_string())
    }

    fn load(&self, _grammar: &str) -> Result<LoadedArtifact, LoadFailure> {
        Ok(LoadedArtifact {
            language_fn: self.language_fn,
            library: None,
        })
    }
}
