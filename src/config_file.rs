//! Settings file handling
//!
//! Settings are read from a JSON file given with `--config`. Every field is
//! optional in the file; command-line flags override what it says.
//!
//! ```json
//! {
//!   "package_manager": "dnf",
//!   "grammar_version": "rhel9",
//!   "assume_yes": false,
//!   "extra_args": ["--setopt=install_weak_deps=False"]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::grammar::GrammarVersion;

/// Default package manager binary
pub const DEFAULT_PACKAGE_MANAGER: &str = "dnf";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Binary the install request is handed to
    pub package_manager: String,
    /// Kickstart grammar revision used for parsing
    pub grammar_version: GrammarVersion,
    /// Answer yes to the package manager's confirmation prompt
    pub assume_yes: bool,
    /// Extra arguments placed after `install`
    pub extra_args: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_manager: DEFAULT_PACKAGE_MANAGER.to_string(),
            grammar_version: GrammarVersion::default(),
            assume_yes: false,
            extra_args: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.package_manager.trim().is_empty() {
            anyhow::bail!("Package manager must be specified");
        }
        if let Some(arg) = self
            .extra_args
            .iter()
            .find(|arg| arg.contains('\n') || arg.contains('\0'))
        {
            anyhow::bail!("Extra argument {:?} contains a newline or NUL byte", arg);
        }
        Ok(())
    }
}
