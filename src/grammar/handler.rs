//! Data collected while parsing a kickstart file

use clap::Parser;

use super::version::{GrammarVersion, SectionOpen};

/// How much of a group gets installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupInclude {
    /// Mandatory and default packages
    #[default]
    Default,
    /// Mandatory, default and optional packages (`--optional`)
    All,
    /// Mandatory packages only (`--nodefaults`)
    Required,
}

/// A group referenced by an `@group` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub include: GroupInclude,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include: GroupInclude::Default,
        }
    }

    pub fn with_include(mut self, include: GroupInclude) -> Self {
        self.include = include;
        self
    }
}

/// Options accepted on the `%packages` header line
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
pub struct PackagesOptions {
    #[arg(long)]
    pub default: bool,
    #[arg(long)]
    pub excludedocs: bool,
    #[arg(long)]
    pub ignoremissing: bool,
    #[arg(long)]
    pub ignorebroken: bool,
    #[arg(long)]
    pub nobase: bool,
    #[arg(long)]
    pub nocore: bool,
    #[arg(long)]
    pub multilib: bool,
    #[arg(long = "excludeWeakdeps", alias = "exclude-weakdeps")]
    pub exclude_weakdeps: bool,
    #[arg(long = "instLangs", alias = "inst-langs")]
    pub inst_langs: Option<String>,
    #[arg(long)]
    pub retries: Option<u32>,
    #[arg(long)]
    pub timeout: Option<u32>,
}

/// Package and group selections from all `%packages` blocks, in file order.
///
/// Entries repeated across blocks are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packages {
    pub packages: Vec<String>,
    pub groups: Vec<Group>,
    pub excluded_packages: Vec<String>,
    pub excluded_groups: Vec<String>,
    /// `@^environment`; a later line replaces an earlier one
    pub environment: Option<String>,
    pub options: PackagesOptions,
    /// Set once any `%packages` header has been seen
    pub seen: bool,
}

impl Packages {
    /// True when nothing would be marked for installation.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.groups.is_empty() && self.environment.is_none()
    }
}

/// A script body from `%pre`, `%post` and friends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub kind: SectionOpen,
    pub body: String,
    pub interpreter: String,
    pub error_on_fail: bool,
    pub in_chroot: bool,
    pub log: Option<String>,
    pub line: usize,
}

/// Body of an `%addon` or `%anaconda` block, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonData {
    pub kind: SectionOpen,
    pub name: Option<String>,
    pub args: Vec<String>,
    pub body: Vec<String>,
    pub line: usize,
}

/// A top-level command line, tokenised but not interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KickstartCommandLine {
    pub name: String,
    pub args: Vec<String>,
    pub line: usize,
}

/// Everything a parse produced, for one grammar version
#[derive(Debug, Clone, Default)]
pub struct KickstartHandler {
    version: GrammarVersion,
    pub packages: Packages,
    pub scripts: Vec<Script>,
    pub addons: Vec<AddonData>,
    pub commands: Vec<KickstartCommandLine>,
}

impl KickstartHandler {
    pub fn new(version: GrammarVersion) -> Self {
        Self {
            version,
            ..Self::default()
        }
    }

    pub fn version(&self) -> GrammarVersion {
        self.version
    }
}
