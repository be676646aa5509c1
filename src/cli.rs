use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config_file::Settings;
use crate::grammar::GrammarVersion;

/// ksinstall - install the package selections of a kickstart file
#[derive(Debug, Parser)]
#[command(name = "ksinstall")]
#[command(about = "Install packages and groups listed in kickstart files")]
#[command(version)]
pub struct Cli {
    /// Settings file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the package manager invocation instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Answer yes to the package manager's confirmation prompt
    #[arg(short = 'y', long)]
    pub assumeyes: bool,

    /// Kickstart grammar revision (rhel6, rhel7, rhel8, rhel9, devel)
    #[arg(long)]
    pub grammar: Option<GrammarVersion>,

    /// Package manager binary to hand the install request to
    #[arg(long)]
    pub package_manager: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// List registered commands and exit
    #[arg(long)]
    pub list_commands: bool,

    /// Command verb followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<OsString>,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Apply command-line overrides on top of file settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(version) = self.grammar {
            settings.grammar_version = version;
        }
        if let Some(program) = &self.package_manager {
            settings.package_manager = program.clone();
        }
        if self.assumeyes {
            settings.assume_yes = true;
        }
    }

    /// Split the trailing arguments into verb and command arguments.
    pub fn verb(&self) -> Option<(String, &[OsString])> {
        let (verb, args) = self.command.split_first()?;
        Some((verb.to_string_lossy().into_owned(), args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_kickstart_command() {
        let cli = Cli::try_parse_from(["ksinstall", "kickstart", "/root/anaconda-ks.cfg"]).unwrap();
        let (verb, args) = cli.verb().unwrap();
        assert_eq!(verb, "kickstart");
        assert_eq!(args, [OsString::from("/root/anaconda-ks.cfg")]);
    }

    #[test]
    fn test_cli_keeps_extra_paths_for_the_command() {
        let cli = Cli::try_parse_from(["ksinstall", "kickstart", "path1.ks", "path2.ks"]).unwrap();
        let (_, args) = cli.verb().unwrap();
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "ksinstall",
            "--dry-run",
            "-y",
            "--grammar",
            "rhel8",
            "-vv",
            "ks",
            "file.ks",
        ])
        .unwrap();
        assert!(cli.dry_run);
        assert!(cli.assumeyes);
        assert_eq!(cli.grammar, Some(GrammarVersion::Rhel8));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.verb().unwrap().0, "ks");
    }

    #[test]
    fn test_cli_rejects_unknown_grammar() {
        assert!(Cli::try_parse_from(["ksinstall", "--grammar", "f42", "ks", "a.ks"]).is_err());
    }

    #[test]
    fn test_cli_no_command() {
        let cli = Cli::try_parse_from(["ksinstall"]).unwrap();
        assert!(cli.verb().is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::try_parse_from([
            "ksinstall",
            "--package-manager",
            "dnf5",
            "--grammar",
            "rhel9",
            "ks",
            "a.ks",
        ])
        .unwrap();
        let mut settings = Settings::default();
        cli.apply_overrides(&mut settings);
        assert_eq!(settings.package_manager, "dnf5");
        assert_eq!(settings.grammar_version, GrammarVersion::Rhel9);
        assert!(!settings.assume_yes);
    }
}
