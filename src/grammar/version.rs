//! Grammar versions and section-open tokens
//!
//! The grammar version is an explicit value handed to `KickstartHandler::new`.
//! It decides which sections a parser registers.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Kickstart grammar revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GrammarVersion {
    Rhel6,
    Rhel7,
    Rhel8,
    Rhel9,
    /// Newest grammar; the default
    #[default]
    Devel,
}

impl GrammarVersion {
    /// Section-open tokens this revision understands.
    pub fn sections(self) -> &'static [SectionOpen] {
        use SectionOpen::*;
        match self {
            Self::Rhel6 => &[Packages, Pre, Post, Traceback],
            Self::Rhel7 | Self::Rhel8 | Self::Rhel9 | Self::Devel => &[
                Packages, Pre, PreInstall, Post, Traceback, OnError, Addon, Anaconda,
            ],
        }
    }

    pub fn supports(self, open: SectionOpen) -> bool {
        self.sections().contains(&open)
    }
}

/// Token that opens a `%section ... %end` block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Display, EnumString, EnumIter, AsRefStr)]
pub enum SectionOpen {
    #[strum(serialize = "%packages")]
    Packages,
    #[strum(serialize = "%pre")]
    Pre,
    #[strum(serialize = "%pre-install")]
    PreInstall,
    #[strum(serialize = "%post")]
    Post,
    #[strum(serialize = "%traceback")]
    Traceback,
    #[strum(serialize = "%onerror")]
    OnError,
    #[strum(serialize = "%addon")]
    Addon,
    #[strum(serialize = "%anaconda")]
    Anaconda,
}

impl SectionOpen {
    /// Sections whose body is a script handed to an interpreter.
    pub fn is_script(self) -> bool {
        matches!(
            self,
            Self::Pre | Self::PreInstall | Self::Post | Self::Traceback | Self::OnError
        )
    }
}
