//! `kickstart` command
//!
//! Installs the packages and groups listed in the `%packages` section of a
//! kickstart file. Script sections in the file are never run.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{info, warn};

use super::{CliCommand, CommandContext};
use crate::error::{CommandError, MarkingError, Result};
use crate::package_manager::{Demands, PackageManager};
use crate::selective::parse_kickstart_packages;

const ALIASES: &[&str] = &["kickstart", "ks"];
const SUMMARY: &str = "Install packages defined in a kickstart file on your system";

#[derive(Debug, Parser)]
#[command(name = "kickstart", about = SUMMARY)]
struct KickstartArgs {
    /// Kickstart file
    filename: PathBuf,
}

/// Marks a kickstart file's package selections for installation
#[derive(Debug, Default)]
pub struct KickstartCommand;

impl KickstartCommand {
    pub fn new() -> Self {
        Self
    }

    fn parse_args(args: &[OsString]) -> Result<KickstartArgs> {
        let argv = std::iter::once(OsString::from(ALIASES[0])).chain(args.iter().cloned());
        Ok(KickstartArgs::try_parse_from(argv)?)
    }

    /// Absolute path to a readable regular file.
    fn resolve(path: &Path) -> Result<PathBuf> {
        let not_found = || CommandError::FileNotFound(path.to_path_buf());
        let resolved = std::path::absolute(path).map_err(|_| not_found())?;
        if !resolved.is_file() || File::open(&resolved).is_err() {
            return Err(not_found());
        }
        Ok(resolved)
    }

    /// A group that cannot be marked fails the command unless the file asked
    /// for missing entries to be ignored.
    fn group_failure(err: MarkingError, ignore_missing: bool) -> Result<()> {
        if ignore_missing {
            warn!("{} (ignored)", err);
            Ok(())
        } else {
            Err(CommandError::GroupUnavailable(err))
        }
    }
}

impl CliCommand for KickstartCommand {
    fn aliases(&self) -> &'static [&'static str] {
        ALIASES
    }

    fn summary(&self) -> &'static str {
        SUMMARY
    }

    fn configure(&self, demands: &mut Demands) {
        demands.resolving = true;
        demands.root_user = true;
    }

    fn run(&mut self, ctx: &mut CommandContext<'_>, args: &[OsString]) -> Result<()> {
        let opts = Self::parse_args(args)?;
        let path = Self::resolve(&opts.filename)?;
        let packages = parse_kickstart_packages(&path, ctx.grammar_version)?;
        if !packages.seen {
            info!("{} has no %packages section", path.display());
            return Err(CommandError::NothingToDo);
        }
        if packages.is_empty() {
            info!("%packages in {} selects nothing", path.display());
            return Err(CommandError::NothingToDo);
        }
        let ignore_missing = packages.options.ignoremissing;
        let pm = &mut *ctx.package_manager;

        if let Some(env) = &packages.environment {
            if let Err(e) = pm.install_environment(env) {
                Self::group_failure(e, ignore_missing)?;
            }
        }
        for group in &packages.groups {
            if packages.excluded_groups.contains(&group.name) {
                info!("Group {} is excluded by the kickstart file", group.name);
                continue;
            }
            if let Err(e) = pm.install_group(group) {
                Self::group_failure(e, ignore_missing)?;
            }
        }

        for pattern in &packages.packages {
            if let Err(e) = pm.install(pattern) {
                info!("{}", e);
            }
        }

        for pattern in &packages.excluded_packages {
            pm.exclude(pattern);
        }
        for name in &packages.excluded_groups {
            pm.exclude_group(name);
        }

        if pm.request().is_empty() {
            return Err(CommandError::NothingToDo);
        }
        info!(
            "Marked {} package(s) and {} group(s) from {}",
            pm.request().packages.len(),
            pm.request().groups.len(),
            path.display()
        );
        Ok(())
    }
}
