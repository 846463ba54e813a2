//! Compiled grammar libraries on disk
//!
//! `tree-sitter build` produces a shared library exporting a single
//! `tree_sitter_<name>` function. This module names, finds and opens those
//! libraries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use tree_sitter_language::LanguageFn;
use walkdir::WalkDir;

use super::{GrammarLoader, GrammarSource, LoadedArtifact};
use crate::verify::LoadFailure;

/// Raw signature of a grammar entry point
type LanguageEntry = unsafe extern "C" fn() -> *const ();

#[cfg(target_os = "macos")]
const LIBRARY_PREFIX: &str = "lib";
#[cfg(target_os = "macos")]
const LIBRARY_SUFFIX: &str = ".dylib";

#[cfg(windows)]
const LIBRARY_PREFIX: &str = "";
#[cfg(windows)]
const LIBRARY_SUFFIX: &str = ".dll";

#[cfg(not(any(target_os = "macos", windows)))]
const LIBRARY_PREFIX: &str = "lib";
#[cfg(not(any(target_os = "macos", windows)))]
const LIBRARY_SUFFIX: &str = ".so";

/// Platform file name of the compiled library for grammar `name`
///
/// # Examples
/// ```
/// use scribl_grammar_verifier::grammar::dynamic::library_file_name;
///
/// let file = library_file_name("scribl");
/// assert!(file.contains("tree-sitter-scribl"));
/// ```
pub fn library_file_name(name: &str) -> String {
    format!("{LIBRARY_PREFIX}tree-sitter-{name}{LIBRARY_SUFFIX}")
}

/// Grammar name encoded in a library file name, if it is one
pub fn grammar_name_from_file(file_name: &str) -> Option<&str> {
    let name = file_name
        .strip_prefix(LIBRARY_PREFIX)?
        .strip_prefix("tree-sitter-")?
        .strip_suffix(LIBRARY_SUFFIX)?;

    (!name.is_empty()).then_some(name)
}

/// Exported entry symbol for grammar `name`
///
/// # Examples
/// ```
/// use scribl_grammar_verifier::grammar::dynamic::entry_symbol;
///
/// assert_eq!(entry_symbol("scribl"), "tree_sitter_scribl");
/// assert_eq!(entry_symbol("c-sharp"), "tree_sitter_c_sharp");
/// ```
pub fn entry_symbol(name: &str) -> String {
    format!("tree_sitter_{}", name.replace('-', "_"))
}

/// First search directory holding the library for `name`
pub fn locate(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    let file_name = library_file_name(name);

    search_paths
        .iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

/// Every grammar library directly inside the search directories
///
/// Results are sorted by grammar name. When the same grammar appears in
/// several directories, the earliest directory wins.
pub fn discover(search_paths: &[PathBuf]) -> Vec<(String, PathBuf)> {
    let mut found: Vec<(String, PathBuf)> = Vec::new();

    for dir in search_paths.iter().filter(|dir| dir.is_dir()) {
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            // Installed libraries are usually symlinks to a versioned file.
            .filter(|e| e.path().is_file())
        {
            let Some(name) = entry.file_name().to_str().and_then(grammar_name_from_file) else {
                continue;
            };

            if found.iter().any(|(existing, _)| existing == name) {
                log::debug!("Shadowed grammar library: {}", entry.path().display());
                continue;
            }

            found.push((name.to_string(), entry.path().to_path_buf()));
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

/// Open a grammar library and resolve its entry point
pub fn open(grammar: &str, name: &str, path: &Path) -> Result<LoadedArtifact, LoadFailure> {
    log::debug!("Opening grammar library {}", path.display());

    if !path.is_file() {
        return Err(LoadFailure::LibraryNotFound {
            grammar: grammar.to_string(),
            path: path.display().to_string(),
        });
    }

    // SAFETY: a tree-sitter grammar library has no initialisers beyond the C
    // runtime's; loading foreign code is the point of this check.
    let library = unsafe { Library::new(path) }.map_err(|e| LoadFailure::ArtifactUnloadable {
        grammar: grammar.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let symbol_name = entry_symbol(name);
    let entry: LanguageEntry = {
        // SAFETY: the entry symbol is declared by tree-sitter as
        // `const TSLanguage *tree_sitter_<name>(void)`.
        let symbol: Symbol<LanguageEntry> = unsafe { library.get(symbol_name.as_bytes()) }
            .map_err(|_| LoadFailure::MissingSymbol {
                grammar: grammar.to_string(),
                symbol: symbol_name.clone(),
            })?;
        *symbol
    };

    Ok(LoadedArtifact {
        // SAFETY: `entry` has the generated-parser signature and stays valid
        // while `library` is held alongside it.
        language_fn: unsafe { LanguageFn::from_raw(entry) },
        library: Some(Arc::new(library)),
    })
}

/// Loads the grammar library at a fixed path
#[derive(Debug, Clone)]
pub struct LibraryLoader {
    name: String,
    path: PathBuf,
}

impl LibraryLoader {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build a loader from a library path, deriving the grammar name from
    /// the file name
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(grammar_name_from_file)?
            .to_string();

        Some(Self { name, path })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GrammarLoader for LibraryLoader {
    fn source(&self) -> GrammarSource {
        GrammarSource::Library {
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }

    fn load(&self, grammar: &str) -> Result<LoadedArtifact, LoadFailure> {
        open(grammar, &self.name, &self.path)
    }
}

/// Loads grammar `name` from the first search directory that has it
#[derive(Debug, Clone)]
pub struct SearchLoader {
    name: String,
    search_paths: Vec<PathBuf>,
}

impl SearchLoader {
    pub fn new(name: impl Into<String>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            search_paths,
        }
    }
}

impl GrammarLoader for SearchLoader {
    fn source(&self) -> GrammarSource {
        GrammarSource::Search {
            name: self.name.clone(),
            paths: self.search_paths.clone(),
        }
    }

    fn load(&self, grammar: &str) -> Result<LoadedArtifact, LoadFailure> {
        let path = locate(&self.name, &self.search_paths).ok_or_else(|| {
            LoadFailure::ArtifactMissing {
                grammar: grammar.to_string(),
                file: library_file_name(&self.name),
                searched: self.search_paths.len(),
            }
        })?;

        open(grammar, &self.name, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_name_and_grammar_name_agree() {
        let file = library_file_name("scribl");
        assert_eq!(grammar_name_from_file(&file), Some("scribl"));
        assert_eq!(grammar_name_from_file("tree-sitter.txt"), None);
        assert_eq!(grammar_name_from_file(&library_file_name("")), None);
    }

    #[test]
    fn locate_prefers_earlier_directories() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join(library_file_name("scribl")), b"x").unwrap();

        let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            locate("scribl", &paths),
            Some(second.path().join(library_file_name("scribl")))
        );

        fs::write(first.path().join(library_file_name("scribl")), b"x").unwrap();
        assert_eq!(
            locate("scribl", &paths),
            Some(first.path().join(library_file_name("scribl")))
        );
    }

    #[test]
    fn discover_lists_libraries_sorted_and_deduplicated() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join(library_file_name("scribl")), b"x").unwrap();
        fs::write(first.path().join("README.md"), b"x").unwrap();
        fs::write(second.path().join(library_file_name("scribl")), b"x").unwrap();
        fs::write(second.path().join(library_file_name("abc")), b"x").unwrap();

        let found = discover(&[first.path().to_path_buf(), second.path().to_path_buf()]);
        let names: Vec<&str> = found.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["abc", "scribl"]);
        assert!(found[1].1.starts_with(first.path()));
    }

    #[cfg(unix)]
    #[test]
    fn discover_follows_symlinked_libraries() {
        let dir = TempDir::new().unwrap();
        let versioned = dir.path().join(format!("{}.0", library_file_name("scribl")));
        let link = dir.path().join(library_file_name("scribl"));
        fs::write(&versioned, b"x").unwrap();
        std::os::unix::fs::symlink(&versioned, &link).unwrap();

        let paths = vec![dir.path().to_path_buf()];
        assert_eq!(locate("scribl", &paths), Some(link.clone()));
        assert_eq!(discover(&paths), vec![("scribl".to_string(), link)]);
    }

    #[test]
    fn fixed_path_that_does_not_exist_is_not_a_search() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(library_file_name("scribl"));
        let loader = LibraryLoader::new("scribl", &path);

        let err = loader.load("Scribl").err().unwrap();
        assert_eq!(
            err,
            LoadFailure::LibraryNotFound {
                grammar: "Scribl".to_string(),
                path: path.display().to_string(),
            }
        );
        assert!(!err.to_string().contains("search path"));
    }

    #[test]
    fn missing_library_is_reported_with_search_count() {
        let dir = TempDir::new().unwrap();
        let loader = SearchLoader::new("scribl", vec![dir.path().to_path_buf()]);

        let err = loader.load("Scribl").err().unwrap();
        assert_eq!(
            err,
            LoadFailure::ArtifactMissing {
                grammar: "Scribl".to_string(),
                file: library_file_name("scribl"),
                searched: 1,
            }
        );
    }

    #[test]
    fn from_path_requires_a_grammar_file_name() {
        assert!(LibraryLoader::from_path("/tmp/not-a-grammar.txt").is_none());
        let loader = LibraryLoader::from_path(format!("/tmp/{}", library_file_name("scribl"))).unwrap();
        assert_eq!(loader.name(), "scribl");
    }
}
