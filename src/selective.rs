//! Selective kickstart parsing
//!
//! Kickstart files handed to `ksinstall` are not trusted. Only the
//! `%packages` selections are used; every other section is swapped for a
//! `NullSection` before the file is read, so `%pre`, `%post`, `%traceback`
//! and the rest are accepted syntactically and dropped unexecuted.
//!
//! Masking is one-way. There is no way to put a masked handler back.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::KickstartError;
use crate::grammar::{
    GrammarVersion, KickstartHandler, KickstartParser, NullSection, Packages, Section,
    SectionOpen,
};

/// A kickstart parser whose sections can be masked out
#[derive(Debug)]
pub struct MaskableKickstartParser {
    inner: KickstartParser,
}

impl MaskableKickstartParser {
    pub fn new(handler: KickstartHandler) -> Self {
        Self {
            inner: KickstartParser::new(handler),
        }
    }

    /// Handler currently registered for `open`.
    pub fn section(&self, open: SectionOpen) -> Option<&dyn Section> {
        self.inner.section(open)
    }

    /// Replace the handler of every registered section not in `excluded`
    /// with a `NullSection`. Sections in `excluded` keep their handler
    /// instance.
    pub fn mask_all(&mut self, excluded: &BTreeSet<SectionOpen>) {
        let targets: Vec<SectionOpen> = self
            .inner
            .section_opens()
            .filter(|open| !excluded.contains(open))
            .collect();

        for open in targets {
            debug!("Masking section {}", open);
            self.inner.register_section(Box::new(NullSection::new(open)));
        }
    }

    pub fn read_kickstart(&mut self, path: &Path) -> Result<(), KickstartError> {
        self.inner.read_kickstart(path)
    }

    pub fn read_kickstart_from_str(&mut self, text: &str) -> Result<(), KickstartError> {
        self.inner.read_kickstart_from_str(text)
    }

    pub fn handler(&self) -> &KickstartHandler {
        self.inner.handler()
    }

    pub fn into_handler(self) -> KickstartHandler {
        self.inner.into_handler()
    }
}

/// Read the `%packages` selections from the kickstart file at `path`.
///
/// All other sections are masked before parsing. A missing file or broken
/// grammar comes back as a `KickstartError`.
pub fn parse_kickstart_packages(
    path: &Path,
    version: GrammarVersion,
) -> Result<Packages, KickstartError> {
    let mut parser = MaskableKickstartParser::new(KickstartHandler::new(version));
    parser.mask_all(&BTreeSet::from([SectionOpen::Packages]));
    parser.read_kickstart(path)?;
    Ok(parser.into_handler().packages)
}
