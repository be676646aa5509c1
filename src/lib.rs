//! ksinstall Library
//!
//! Reads the `%packages` selections of kickstart files and marks them for
//! installation against a package manager. Script sections in those files
//! are parsed but never kept or run.

pub mod cli;
pub mod commands;
pub mod config_file;
pub mod error;
pub mod grammar;
pub mod package_manager;
pub mod selective;

// Re-export main types for convenience
pub use commands::{CliCommand, CommandContext, CommandRegistry, KickstartCommand};
pub use config_file::Settings;
pub use error::{CommandError, KickstartError, MarkingError, TransactionError};
pub use grammar::{GrammarVersion, Group, GroupInclude, KickstartHandler, Packages, SectionOpen};
pub use package_manager::{
    Demands, InstallRequest, MemoryPackageManager, PackageManager, SystemPackageManager,
};
pub use selective::{parse_kickstart_packages, MaskableKickstartParser};
