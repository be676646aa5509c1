//! Install-request seam to the package manager
//!
//! Commands only mark what should be installed. Dependency resolution and
//! the transaction itself belong to the package manager behind this trait.
//!
//! # Backends
//!
//! - `MemoryPackageManager` — answers from a fixed catalog, used when
//!   embedding and in tests
//! - `SystemPackageManager` — hands the request to an external binary
//!   (`dnf` by default)

use crate::error::MarkingError;
use crate::grammar::Group;

pub mod memory;
pub mod system;

pub use memory::MemoryPackageManager;
pub use system::SystemPackageManager;

/// Everything marked for the next transaction, in marking order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub packages: Vec<String>,
    pub groups: Vec<Group>,
    pub environment: Option<String>,
    pub excluded_packages: Vec<String>,
    pub excluded_groups: Vec<String>,
}

impl InstallRequest {
    /// True when nothing is marked for installation.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.groups.is_empty() && self.environment.is_none()
    }
}

/// Install-request API a command marks selections against
pub trait PackageManager {
    /// Mark a package name or pattern for installation.
    fn install(&mut self, pattern: &str) -> Result<(), MarkingError>;

    /// Mark a group for installation.
    fn install_group(&mut self, group: &Group) -> Result<(), MarkingError>;

    /// Mark an environment for installation.
    fn install_environment(&mut self, name: &str) -> Result<(), MarkingError>;

    /// Keep a package out of the transaction.
    fn exclude(&mut self, pattern: &str);

    /// Keep a group out of the transaction.
    fn exclude_group(&mut self, name: &str);

    /// What has been marked so far.
    fn request(&self) -> &InstallRequest;
}

/// What a command needs from the surrounding CLI before it runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Demands {
    /// The marked request must be resolved and executed afterwards
    pub resolving: bool,
    /// Executing the transaction needs root
    pub root_user: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_empty() {
        let mut request = InstallRequest::default();
        assert!(request.is_empty());
        request.excluded_packages.push("nano".into());
        assert!(request.is_empty());
        request.groups.push(Group::new("core"));
        assert!(!request.is_empty());
    }
}
