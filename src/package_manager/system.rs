//! Hands the install request to an external package manager binary
//!
//! Marking never fails here: availability is only known to the external
//! tool, which checks it when the transaction runs.

use std::process::Command;

use tracing::{debug, info, warn};

use super::{InstallRequest, PackageManager};
use crate::config_file::Settings;
use crate::error::{MarkingError, TransactionError};
use crate::grammar::{Group, GroupInclude};

/// Package manager that runs `<program> install ...` once marking is done
#[derive(Debug, Clone)]
pub struct SystemPackageManager {
    program: String,
    assume_yes: bool,
    extra_args: Vec<String>,
    request: InstallRequest,
}

impl SystemPackageManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            assume_yes: false,
            extra_args: Vec::new(),
            request: InstallRequest::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            program: settings.package_manager.clone(),
            assume_yes: settings.assume_yes,
            extra_args: settings.extra_args.clone(),
            request: InstallRequest::default(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program for the marked request.
    pub fn install_args(&self) -> Vec<String> {
        let request = &self.request;
        let mut args = vec!["install".to_string()];
        if self.assume_yes {
            args.push("-y".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.extend(
            request
                .excluded_packages
                .iter()
                .map(|pkg| format!("--exclude={pkg}")),
        );
        args.extend(request.packages.iter().cloned());
        args.extend(request.groups.iter().map(|g| format!("@{}", g.name)));
        if let Some(env) = &request.environment {
            args.push(format!("@^{env}"));
        }
        args
    }

    /// Run the transaction, or only log it when `dry_run` is set.
    pub fn execute(&self, dry_run: bool, require_root: bool) -> Result<(), TransactionError> {
        let args = self.install_args();
        if dry_run {
            info!("Dry run: {} {}", self.program, args.join(" "));
            println!("{} {}", self.program, args.join(" "));
            return Ok(());
        }

        if require_root && !nix::unistd::geteuid().is_root() {
            return Err(TransactionError::NotRoot);
        }

        info!("Running {} {}", self.program, args.join(" "));
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| TransactionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(TransactionError::Failed {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}

impl PackageManager for SystemPackageManager {
    fn install(&mut self, pattern: &str) -> Result<(), MarkingError> {
        debug!("Marked package {}", pattern);
        self.request.packages.push(pattern.to_string());
        Ok(())
    }

    fn install_group(&mut self, group: &Group) -> Result<(), MarkingError> {
        if group.include != GroupInclude::Default {
            warn!(
                "{} cannot take a per-group include level; installing default packages of @{}",
                self.program, group.name
            );
        }
        self.request.groups.push(group.clone());
        Ok(())
    }

    fn install_environment(&mut self, name: &str) -> Result<(), MarkingError> {
        self.request.environment = Some(name.to_string());
        Ok(())
    }

    fn exclude(&mut self, pattern: &str) {
        self.request.excluded_packages.push(pattern.to_string());
    }

    fn exclude_group(&mut self, name: &str) {
        warn!(
            "{} cannot exclude a group on the install command line; -@{} only keeps it from being listed",
            self.program, name
        );
        self.request.excluded_groups.push(name.to_string());
    }

    fn request(&self) -> &InstallRequest {
        &self.request
    }
}
