//! In-memory package manager backed by a fixed catalog

use std::collections::BTreeSet;

use tracing::debug;

use super::{InstallRequest, PackageManager};
use crate::error::MarkingError;
use crate::grammar::Group;

/// Package manager answering from a fixed set of available names.
///
/// An empty group catalog behaves like repositories without group metadata:
/// every group or environment lookup fails with `MarkingError::NoGroupData`.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackageManager {
    available_packages: BTreeSet<String>,
    available_groups: BTreeSet<String>,
    available_environments: BTreeSet<String>,
    request: InstallRequest,
}

impl MemoryPackageManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_packages
            .extend(packages.into_iter().map(Into::into));
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    pub fn with_environments<I, S>(mut self, environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available_environments
            .extend(environments.into_iter().map(Into::into));
        self
    }

    /// Names of the packages marked for installation.
    pub fn installed_packages(&self) -> BTreeSet<&str> {
        self.request.packages.iter().map(String::as_str).collect()
    }

    /// Names of the groups marked for installation.
    pub fn installed_groups(&self) -> BTreeSet<&str> {
        self.request.groups.iter().map(|g| g.name.as_str()).collect()
    }

    fn has_group_data(&self) -> bool {
        !self.available_groups.is_empty() || !self.available_environments.is_empty()
    }
}

impl PackageManager for MemoryPackageManager {
    fn install(&mut self, pattern: &str) -> Result<(), MarkingError> {
        if !self.available_packages.contains(pattern) {
            return Err(MarkingError::NoSuchPackage(pattern.to_string()));
        }
        debug!("Marked package {}", pattern);
        self.request.packages.push(pattern.to_string());
        Ok(())
    }

    fn install_group(&mut self, group: &Group) -> Result<(), MarkingError> {
        if !self.has_group_data() {
            return Err(MarkingError::NoGroupData);
        }
        if !self.available_groups.contains(&group.name) {
            return Err(MarkingError::NoSuchGroup(group.name.clone()));
        }
        debug!("Marked group {}", group.name);
        self.request.groups.push(group.clone());
        Ok(())
    }

    fn install_environment(&mut self, name: &str) -> Result<(), MarkingError> {
        if !self.has_group_data() {
            return Err(MarkingError::NoGroupData);
        }
        if !self.available_environments.contains(name) {
            return Err(MarkingError::NoSuchEnvironment(name.to_string()));
        }
        self.request.environment = Some(name.to_string());
        Ok(())
    }

    fn exclude(&mut self, pattern: &str) {
        self.request.excluded_packages.push(pattern.to_string());
    }

    fn exclude_group(&mut self, name: &str) {
        self.request.excluded_groups.push(name.to_string());
    }

    fn request(&self) -> &InstallRequest {
        &self.request
    }
}
