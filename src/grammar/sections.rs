//! Section handlers
//!
//! Each `%token ... %end` block is driven through a `Section`. The parser
//! keeps one boxed handler per token; replacing a handler changes how that
//! block is treated without touching the parser itself.
//!
//! | Handler          | Records into `KickstartHandler` |
//! |------------------|---------------------------------|
//! | `PackageSection` | `packages`                      |
//! | `ScriptSection`  | `scripts`                       |
//! | `AddonSection`   | `addons`                        |
//! | `NullSection`    | nothing                         |

use std::fmt;

use clap::Parser;
use tracing::{debug, trace};

use super::handler::{AddonData, Group, GroupInclude, KickstartHandler, PackagesOptions, Script};
use super::version::SectionOpen;
use crate::error::KickstartError;

const DEFAULT_INTERPRETER: &str = "/bin/sh";

/// Handler for one kind of section
pub trait Section: fmt::Debug {
    /// Token this handler answers to
    fn open(&self) -> SectionOpen;

    /// True for handlers that drop their content
    fn is_null(&self) -> bool {
        false
    }

    /// Called with the words following the token on the opening line.
    fn handle_header(
        &mut self,
        args: &[String],
        line: usize,
        data: &mut KickstartHandler,
    ) -> Result<(), KickstartError>;

    /// Called once per body line, untrimmed.
    fn handle_line(
        &mut self,
        text: &str,
        line: usize,
        data: &mut KickstartHandler,
    ) -> Result<(), KickstartError>;

    /// Called when `%end` closes the block.
    fn finalize(&mut self, data: &mut KickstartHandler) -> Result<(), KickstartError>;
}

/// First line of a clap error, without the `error: ` prefix
fn clap_reason(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

// ============================================================================
// %packages
// ============================================================================

/// Records package, group and environment selections
#[derive(Debug, Default)]
pub struct PackageSection;

impl PackageSection {
    pub fn new() -> Self {
        Self
    }

    fn parse_group(rest: &str, line: usize) -> Result<Group, KickstartError> {
        let mut words = rest.split_whitespace();
        let name = words.next().ok_or_else(|| KickstartError::InvalidLine {
            line,
            reason: "Group line without a group name".to_string(),
        })?;

        let mut group = Group::new(name);
        for flag in words {
            group.include = match flag {
                "--nodefaults" => GroupInclude::Required,
                "--optional" => GroupInclude::All,
                other => {
                    return Err(KickstartError::InvalidLine {
                        line,
                        reason: format!("Unknown option {other} for group {name}"),
                    })
                }
            };
        }
        Ok(group)
    }
}

impl Section for PackageSection {
    fn open(&self) -> SectionOpen {
        SectionOpen::Packages
    }

    fn handle_header(
        &mut self,
        args: &[String],
        line: usize,
        data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        let options =
            PackagesOptions::try_parse_from(args).map_err(|e| KickstartError::InvalidOptions {
                line,
                section: SectionOpen::Packages,
                reason: clap_reason(&e),
            })?;
        data.packages.options = options;
        data.packages.seen = true;
        Ok(())
    }

    fn handle_line(
        &mut self,
        text: &str,
        line: usize,
        data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        let entry = text.split('#').next().unwrap_or_default().trim();
        if entry.is_empty() {
            return Ok(());
        }

        let packages = &mut data.packages;
        if let Some(env) = entry.strip_prefix("@^") {
            let env = env.trim();
            if env.is_empty() {
                return Err(KickstartError::InvalidLine {
                    line,
                    reason: "Environment line without a name".to_string(),
                });
            }
            packages.environment = Some(env.to_string());
        } else if let Some(group) = entry.strip_prefix("-@") {
            let group = Self::parse_group(group, line)?;
            packages.excluded_groups.push(group.name);
        } else if let Some(group) = entry.strip_prefix('@') {
            packages.groups.push(Self::parse_group(group, line)?);
        } else if let Some(pkg) = entry.strip_prefix('-') {
            let pkg = pkg.trim();
            if pkg.is_empty() {
                return Err(KickstartError::InvalidLine {
                    line,
                    reason: "Exclusion without a package name".to_string(),
                });
            }
            packages.excluded_packages.push(pkg.to_string());
        } else {
            packages.packages.push(entry.to_string());
        }
        trace!("line {}: package entry {}", line, entry);
        Ok(())
    }

    fn finalize(&mut self, _data: &mut KickstartHandler) -> Result<(), KickstartError> {
        Ok(())
    }
}

// ============================================================================
// Script sections
// ============================================================================

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct ScriptOptions {
    #[arg(long)]
    interpreter: Option<String>,
    #[arg(long)]
    erroronfail: bool,
    #[arg(long)]
    nochroot: bool,
    #[arg(long, alias = "logfile")]
    log: Option<String>,
}

/// Records script bodies for `%pre`, `%pre-install`, `%post`, `%traceback`
/// and `%onerror`
#[derive(Debug)]
pub struct ScriptSection {
    kind: SectionOpen,
    current: Option<Script>,
    body: Vec<String>,
}

impl ScriptSection {
    /// Panics if `kind` is not a script section.
    pub fn new(kind: SectionOpen) -> Self {
        assert!(kind.is_script(), "{kind} is not a script section");
        Self {
            kind,
            current: None,
            body: Vec::new(),
        }
    }
}

impl Section for ScriptSection {
    fn open(&self) -> SectionOpen {
        self.kind
    }

    fn handle_header(
        &mut self,
        args: &[String],
        line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        let kind = self.kind;
        let invalid = |reason: String| KickstartError::InvalidOptions {
            line,
            section: kind,
            reason,
        };
        let opts = ScriptOptions::try_parse_from(args).map_err(|e| invalid(clap_reason(&e)))?;
        if opts.nochroot && kind != SectionOpen::Post {
            return Err(invalid("--nochroot is only valid for %post".to_string()));
        }

        self.body.clear();
        self.current = Some(Script {
            kind: self.kind,
            body: String::new(),
            interpreter: opts
                .interpreter
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            error_on_fail: opts.erroronfail,
            in_chroot: self.kind == SectionOpen::Post && !opts.nochroot,
            log: opts.log,
            line,
        });
        Ok(())
    }

    fn handle_line(
        &mut self,
        text: &str,
        _line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        self.body.push(text.to_string());
        Ok(())
    }

    fn finalize(&mut self, data: &mut KickstartHandler) -> Result<(), KickstartError> {
        if let Some(mut script) = self.current.take() {
            script.body = std::mem::take(&mut self.body).join("\n");
            debug!("Recorded {} script from line {}", script.kind, script.line);
            data.scripts.push(script);
        }
        Ok(())
    }
}

// ============================================================================
// %addon / %anaconda
// ============================================================================

/// Keeps `%addon` and `%anaconda` bodies verbatim
#[derive(Debug)]
pub struct AddonSection {
    kind: SectionOpen,
    current: Option<AddonData>,
}

impl AddonSection {
    pub fn new(kind: SectionOpen) -> Self {
        Self {
            kind,
            current: None,
        }
    }
}

impl Section for AddonSection {
    fn open(&self) -> SectionOpen {
        self.kind
    }

    fn handle_header(
        &mut self,
        args: &[String],
        line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        let (name, args) = match self.kind {
            SectionOpen::Addon => {
                let (name, rest) =
                    args.split_first()
                        .ok_or_else(|| KickstartError::InvalidOptions {
                            line,
                            section: SectionOpen::Addon,
                            reason: "%addon requires an addon name".to_string(),
                        })?;
                (Some(name.clone()), rest.to_vec())
            }
            _ => (None, args.to_vec()),
        };
        self.current = Some(AddonData {
            kind: self.kind,
            name,
            args,
            body: Vec::new(),
            line,
        });
        Ok(())
    }

    fn handle_line(
        &mut self,
        text: &str,
        _line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        if let Some(addon) = self.current.as_mut() {
            addon.body.push(text.to_string());
        }
        Ok(())
    }

    fn finalize(&mut self, data: &mut KickstartHandler) -> Result<(), KickstartError> {
        if let Some(addon) = self.current.take() {
            data.addons.push(addon);
        }
        Ok(())
    }
}

// ============================================================================
// Null section
// ============================================================================

/// Accepts a section and throws its content away
#[derive(Debug)]
pub struct NullSection {
    kind: SectionOpen,
}

impl NullSection {
    pub fn new(kind: SectionOpen) -> Self {
        Self { kind }
    }
}

impl Section for NullSection {
    fn open(&self) -> SectionOpen {
        self.kind
    }

    fn is_null(&self) -> bool {
        true
    }

    fn handle_header(
        &mut self,
        _args: &[String],
        line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        debug!("Discarding {} section at line {}", self.kind, line);
        Ok(())
    }

    fn handle_line(
        &mut self,
        _text: &str,
        _line: usize,
        _data: &mut KickstartHandler,
    ) -> Result<(), KickstartError> {
        Ok(())
    }

    fn finalize(&mut self, _data: &mut KickstartHandler) -> Result<(), KickstartError> {
        Ok(())
    }
}

/// Default handler for `open`, as registered by a fresh parser.
pub fn default_section(open: SectionOpen) -> Box<dyn Section> {
    match open {
        SectionOpen::Packages => Box::new(PackageSection::new()),
        SectionOpen::Addon | SectionOpen::Anaconda => Box::new(AddonSection::new(open)),
        _ => Box::new(ScriptSection::new(open)),
    }
}
