//! Shell command registry.
//!
//! Each command is a [`CommandSpec`]: its name, its arguments and an async
//! handler. The root parser is built from [`registry`] and dispatch looks the
//! invoked name up in the same table.

use crate::error::CliResult;
use clap::{Arg, ArgMatches, Command};
use futures::future::BoxFuture;
use sample_client::v1::Client;
use std::io::Write;

pub mod sample;

/// Async entry point of a command.
pub type Handler = for<'a> fn(
    &'a Client,
    &'a ArgMatches,
    &'a mut (dyn Write + Send),
) -> BoxFuture<'a, CliResult<()>>;

/// A shell command: name, help text, arguments and handler.
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub args: fn() -> Vec<Arg>,
    pub handler: Handler,
}

impl CommandSpec {
    /// The clap subcommand for this entry.
    pub fn command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .args((self.args)())
    }
}

/// Every command the shell knows, in help order.
pub fn registry() -> &'static [CommandSpec] {
    sample::COMMANDS
}

/// Look a command up by name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    registry().iter().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = registry().iter().map(|spec| spec.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry().len());
    }

    #[test]
    fn every_command_builds() {
        for spec in registry() {
            spec.command().debug_assert();
        }
        assert!(find("sample-child-list").is_some());
        assert!(find("chassis-list").is_none());
    }
}
