//! Runtime configuration
//!
//! There is no config file. Grammar search directories come from the
//! environment, in priority order:
//!
//! 1. `SCRIBL_GRAMMAR_PATH` (a platform path list)
//! 2. the user data directory, e.g. `~/.local/share/scribl/grammars`
//! 3. `grammars/` next to the executable, then `../share/scribl/grammars`

use std::env;
use std::path::PathBuf;

/// Environment variable holding extra grammar search directories
pub const GRAMMAR_PATH_ENV: &str = "SCRIBL_GRAMMAR_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directories searched for compiled grammar libraries, highest priority
    /// first
    pub search_paths: Vec<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let mut search_paths = Vec::new();

        if let Some(paths) = env::var_os(GRAMMAR_PATH_ENV) {
            search_paths.extend(env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()));
        }

        if let Some(data_dir) = dirs::data_local_dir() {
            search_paths.push(data_dir.join("scribl").join("grammars"));
        }

        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            search_paths.push(exe_dir.join("grammars"));
            search_paths.push(exe_dir.join("..").join("share").join("scribl").join("grammars"));
        }

        log::debug!("Grammar search paths: {search_paths:?}");

        Self { search_paths }
    }

    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }
}
