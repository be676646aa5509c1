//! CLI commands and the registry that dispatches verbs to them

use std::ffi::OsString;

use tracing::debug;

use crate::error::{CommandError, Result};
use crate::grammar::GrammarVersion;
use crate::package_manager::{Demands, PackageManager};

pub mod kickstart;

pub use kickstart::KickstartCommand;

/// What a command runs against
pub struct CommandContext<'a> {
    pub package_manager: &'a mut dyn PackageManager,
    pub grammar_version: GrammarVersion,
}

impl<'a> CommandContext<'a> {
    pub fn new(package_manager: &'a mut dyn PackageManager, grammar_version: GrammarVersion) -> Self {
        Self {
            package_manager,
            grammar_version,
        }
    }
}

/// A verb the CLI can dispatch to
pub trait CliCommand {
    /// Verbs this command answers to; the first one is its name.
    fn aliases(&self) -> &'static [&'static str];

    /// One-line description for command listings.
    fn summary(&self) -> &'static str;

    /// Declare what the CLI must provide around `run`.
    fn configure(&self, _demands: &mut Demands) {}

    /// Run with the arguments that followed the verb.
    fn run(&mut self, ctx: &mut CommandContext<'_>, args: &[OsString]) -> Result<()>;
}

/// Commands registered with the CLI, looked up by verb
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn CliCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in command.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(KickstartCommand::new()));
        registry
    }

    pub fn register(&mut self, command: Box<dyn CliCommand>) {
        debug!("Registering command {}", command.aliases()[0]);
        self.commands.push(command);
    }

    fn position(&self, verb: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| c.aliases().contains(&verb))
    }

    pub fn find(&self, verb: &str) -> Option<&dyn CliCommand> {
        self.position(verb).map(|i| self.commands[i].as_ref())
    }

    /// `(name, summary)` of every registered command.
    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        self.commands
            .iter()
            .map(|c| (c.aliases()[0], c.summary()))
            .collect()
    }

    /// Demands of the command answering to `verb`.
    pub fn demands(&self, verb: &str) -> Result<Demands> {
        let command = self
            .find(verb)
            .ok_or_else(|| CommandError::UnknownCommand(verb.to_string()))?;
        let mut demands = Demands::default();
        command.configure(&mut demands);
        Ok(demands)
    }

    /// Run the command answering to `verb`.
    pub fn dispatch(
        &mut self,
        verb: &str,
        ctx: &mut CommandContext<'_>,
        args: &[OsString],
    ) -> Result<()> {
        let index = self
            .position(verb)
            .ok_or_else(|| CommandError::UnknownCommand(verb.to_string()))?;
        debug!("Dispatching {} with {} argument(s)", verb, args.len());
        self.commands[index].run(ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::MemoryPackageManager;

    #[test]
    fn test_default_registry() {
        let registry = CommandRegistry::with_default_commands();
        assert!(registry.find("kickstart").is_some());
        assert!(registry.find("ks").is_some());
        assert!(registry.find("install").is_none());
        assert_eq!(registry.list()[0].0, "kickstart");
    }

    #[test]
    fn test_demands() {
        let registry = CommandRegistry::with_default_commands();
        let demands = registry.demands("kickstart").unwrap();
        assert!(demands.resolving);
        assert!(demands.root_user);
        assert!(matches!(
            registry.demands("bogus"),
            Err(CommandError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_dispatch_unknown_verb() {
        let mut registry = CommandRegistry::with_default_commands();
        let mut pm = MemoryPackageManager::new();
        let mut ctx = CommandContext::new(&mut pm, GrammarVersion::Devel);
        let err = registry.dispatch("bogus", &mut ctx, &[]).unwrap_err();
        assert_eq!(err.to_string(), "No such command: bogus");
    }
}
