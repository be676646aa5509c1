//! Kickstart grammar
//!
//! Tokenises kickstart files and routes each `%section ... %end` block to a
//! section handler. Top-level commands are recorded verbatim and not
//! interpreted.
//!
//! # Modules
//!
//! - `version` — grammar revisions and section-open tokens
//! - `handler` — data a parse produces (`Packages`, `Script`, ...)
//! - `sections` — the `Section` trait and its handlers
//! - `parser` — the line reader, including `%include`

pub mod handler;
pub mod parser;
pub mod sections;
pub mod version;

pub use handler::{
    AddonData, Group, GroupInclude, KickstartCommandLine, KickstartHandler, Packages,
    PackagesOptions, Script,
};
pub use parser::{KickstartParser, MAX_INCLUDE_DEPTH};
pub use sections::{AddonSection, NullSection, PackageSection, ScriptSection, Section};
pub use version::{GrammarVersion, SectionOpen};
