//! Error types for ksinstall
//!
//! Grammar errors (`KickstartError`) are kept separate from command errors
//! (`CommandError`) so that a parse failure can travel through the command
//! adapter unchanged.

use std::path::PathBuf;

use thiserror::Error;

use crate::grammar::SectionOpen;

/// Errors raised while reading a kickstart file.
#[derive(Error, Debug)]
pub enum KickstartError {
    /// The input file (or an included file) could not be opened
    #[error("Unable to open input kickstart file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `%token` line that no registered section answers to
    #[error("line {line}: Unknown kickstart section: {token}")]
    UnknownSection { line: usize, token: String },

    /// A section was still open when another one started or input ended
    #[error("line {line}: Section {section} does not end with %end")]
    MissingEnd { line: usize, section: SectionOpen },

    /// `%end` outside of any section
    #[error("line {line}: %end does not close any section")]
    UnexpectedEnd { line: usize },

    /// Section header options rejected by the section
    #[error("line {line}: Invalid options for {section}: {reason}")]
    InvalidOptions {
        line: usize,
        section: SectionOpen,
        reason: String,
    },

    /// A line that cannot be tokenised or is malformed for its context
    #[error("line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    /// `%include` nested deeper than the parser allows
    #[error("line {line}: %include nesting exceeds {limit} levels")]
    IncludeDepth { line: usize, limit: usize },
}

impl KickstartError {
    /// Line number the error refers to, if it refers to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Unreadable { .. } => None,
            Self::UnknownSection { line, .. }
            | Self::MissingEnd { line, .. }
            | Self::UnexpectedEnd { line }
            | Self::InvalidOptions { line, .. }
            | Self::InvalidLine { line, .. }
            | Self::IncludeDepth { line, .. } => Some(*line),
        }
    }
}

/// Marking failures reported by a package manager backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarkingError {
    #[error("No package {0} available.")]
    NoSuchPackage(String),

    #[error("No group {0} available.")]
    NoSuchGroup(String),

    #[error("No environment {0} available.")]
    NoSuchEnvironment(String),

    /// Group metadata could not be loaded at all
    #[error("No group data available for configured repositories.")]
    NoGroupData,
}

/// Failure while handing the request to the package manager.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}")]
    Failed { program: String, code: Option<i32> },

    #[error("Installing packages requires root privileges")]
    NotRoot,
}

/// Errors surfaced by a CLI command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Wrong arguments. Terminates the process; never handled as a managed error.
    #[error(transparent)]
    Usage(#[from] clap::Error),

    /// No registered command answers to the verb
    #[error("No such command: {0}")]
    UnknownCommand(String),

    #[error("Kickstart file not found or unreadable: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error(transparent)]
    Kickstart(#[from] KickstartError),

    #[error("{0}")]
    GroupUnavailable(MarkingError),

    #[error("Nothing to do.")]
    NothingToDo,

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl CommandError {
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
