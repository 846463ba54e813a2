//! Grammar load verification
//!
//! [`GrammarVerifier::verify_load`] resolves an artifact through its injected
//! loader and checks that the returned language handle is actually usable:
//! non-null, ABI compatible with the linked runtime, non-empty, and accepted
//! by a parser.

use std::fmt;
use std::sync::Arc;

use libloading::Library;
use thiserror::Error;
use tree_sitter::{Language, Parser, LANGUAGE_VERSION, MIN_COMPATIBLE_LANGUAGE_VERSION};

use crate::grammar::profile::GrammarProfile;
use crate::grammar::{GrammarLoader, LoadedArtifact};
use crate::report::VerifyReport;

/// Why a grammar artifact could not be turned into a usable language handle
///
/// Every variant renders with the `Error loading <Name> grammar` prefix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    #[error("Error loading {grammar} grammar: `{file}` not found in {searched} search path(s)")]
    ArtifactMissing {
        grammar: String,
        file: String,
        searched: usize,
    },

    #[error("Error loading {grammar} grammar: no library at {path}")]
    LibraryNotFound { grammar: String, path: String },

    #[error("Error loading {grammar} grammar: cannot open {path}: {reason}")]
    ArtifactUnloadable {
        grammar: String,
        path: String,
        reason: String,
    },

    #[error("Error loading {grammar} grammar: library does not export `{symbol}`")]
    MissingSymbol { grammar: String, symbol: String },

    #[error("Error loading {grammar} grammar: loader returned a null language")]
    NullHandle { grammar: String },

    #[error(
        "Error loading {grammar} grammar: ABI version {found} is outside the supported range {min}..={max}"
    )]
    IncompatibleVersion {
        grammar: String,
        found: usize,
        min: usize,
        max: usize,
    },

    #[error("Error loading {grammar} grammar: language declares no node kinds")]
    EmptyGrammar { grammar: String },

    #[error("Error loading {grammar} grammar: parser rejected the language: {reason}")]
    ParserRejected { grammar: String, reason: String },

    #[error("Error loading {grammar} grammar: node kind `{kind}` is not defined")]
    MissingNodeKind { grammar: String, kind: String },

    #[error("Error loading {grammar} grammar: field `{field}` is not defined")]
    MissingField { grammar: String, field: String },

    #[error(
        "Error loading {grammar} grammar: sample parsed to root `{found}`, expected `{expected}`"
    )]
    SampleMismatch {
        grammar: String,
        expected: String,
        found: String,
    },
}

impl LoadFailure {
    /// Display name of the grammar that failed
    pub fn grammar(&self) -> &str {
        match self {
            LoadFailure::ArtifactMissing { grammar, .. }
            | LoadFailure::LibraryNotFound { grammar, .. }
            | LoadFailure::ArtifactUnloadable { grammar, .. }
            | LoadFailure::MissingSymbol { grammar, .. }
            | LoadFailure::NullHandle { grammar }
            | LoadFailure::IncompatibleVersion { grammar, .. }
            | LoadFailure::EmptyGrammar { grammar }
            | LoadFailure::ParserRejected { grammar, .. }
            | LoadFailure::MissingNodeKind { grammar, .. }
            | LoadFailure::MissingField { grammar, .. }
            | LoadFailure::SampleMismatch { grammar, .. } => grammar,
        }
    }
}

/// A validated, loaded grammar
///
/// Holds the backing library, if any, so the rule tables stay mapped for as
/// long as the handle (or any clone) is alive.
#[derive(Clone)]
pub struct LanguageHandle {
    grammar: String,
    // Declared before `_library` so it drops first.
    language: Language,
    _library: Option<Arc<Library>>,
}

impl LanguageHandle {
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn abi_version(&self) -> usize {
        self.language.version()
    }

    pub fn node_kind_count(&self) -> usize {
        self.language.node_kind_count()
    }

    pub fn field_count(&self) -> usize {
        self.language.field_count()
    }

    /// A parser configured for this grammar
    pub fn parser(&self) -> Result<Parser, LoadFailure> {
        new_parser(&self.grammar, &self.language)
    }
}

impl fmt::Debug for LanguageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageHandle")
            .field("grammar", &self.grammar)
            .field("abi_version", &self.abi_version())
            .field("node_kind_count", &self.node_kind_count())
            .field("dynamic", &self._library.is_some())
            .finish()
    }
}

fn new_parser(grammar: &str, language: &Language) -> Result<Parser, LoadFailure> {
    let mut parser = Parser::new();
    parser
        .set_language(language)
        .map_err(|e| LoadFailure::ParserRejected {
            grammar: grammar.to_string(),
            reason: e.to_string(),
        })?;
    Ok(parser)
}

/// Checks that a grammar artifact loads into a usable language handle
///
/// The loader is injected at construction, so one verifier type covers
/// compiled-in crates, libraries on disk and hand-supplied entry points.
///
/// # Examples
/// ```
/// use scribl_grammar_verifier::grammar::Grammar;
/// use scribl_grammar_verifier::verify::GrammarVerifier;
///
/// let verifier = GrammarVerifier::new("Rust", Grammar::Rust);
/// let handle = verifier.verify_load().unwrap();
/// assert!(handle.node_kind_count() > 0);
/// ```
pub struct GrammarVerifier<L> {
    name: String,
    loader: L,
    profile: Option<GrammarProfile>,
}

impl<L: GrammarLoader> GrammarVerifier<L> {
    pub fn new(name: impl Into<String>, loader: L) -> Self {
        Self {
            name: name.into(),
            loader,
            profile: None,
        }
    }

    /// Additionally require the structure described by `profile`
    pub fn with_profile(mut self, profile: GrammarProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Load the artifact and validate the resulting handle
    ///
    /// Holds no state between calls: repeated invocations re-resolve the
    /// artifact and reach the same outcome.
    ///
    /// # Errors
    /// Returns a [`LoadFailure`] describing the first check that failed.
    pub fn verify_load(&self) -> Result<LanguageHandle, LoadFailure> {
        log::debug!("Loading {} grammar from {}", self.name, self.loader.source());

        match self.load_and_check() {
            Ok(handle) => {
                log::info!(
                    "Loaded {} grammar (ABI {}, {} node kinds)",
                    self.name,
                    handle.abi_version(),
                    handle.node_kind_count()
                );
                Ok(handle)
            }
            Err(failure) => {
                log::warn!("{failure}");
                Err(failure)
            }
        }
    }

    /// Run [`verify_load`](Self::verify_load) and summarise the outcome
    pub fn check(&self) -> VerifyReport {
        let source = self.loader.source();
        match self.verify_load() {
            Ok(handle) => VerifyReport::passed(&handle, &source),
            Err(failure) => VerifyReport::failed(&self.name, &source, &failure),
        }
    }

    fn load_and_check(&self) -> Result<LanguageHandle, LoadFailure> {
        let LoadedArtifact {
            language_fn,
            library,
        } = self.loader.load(&self.name)?;

        let entry = language_fn.into_raw();
        // SAFETY: grammar entry points take no arguments and return a pointer
        // to static parse tables (or null on a broken build).
        if unsafe { entry() }.is_null() {
            return Err(LoadFailure::NullHandle {
                grammar: self.name.clone(),
            });
        }

        let language = Language::new(language_fn);

        let version = language.version();
        if !(MIN_COMPATIBLE_LANGUAGE_VERSION..=LANGUAGE_VERSION).contains(&version) {
            return Err(LoadFailure::IncompatibleVersion {
                grammar: self.name.clone(),
                found: version,
                min: MIN_COMPATIBLE_LANGUAGE_VERSION,
                max: LANGUAGE_VERSION,
            });
        }

        if language.node_kind_count() == 0 {
            return Err(LoadFailure::EmptyGrammar {
                grammar: self.name.clone(),
            });
        }

        let mut parser = new_parser(&self.name, &language)?;

        if let Some(profile) = &self.profile {
            profile.check(&self.name, &language, &mut parser)?;
        }

        Ok(LanguageHandle {
            grammar: self.name.clone(),
            language,
            _library: library,
        })
    }
}
