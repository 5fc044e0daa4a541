use super::{cli_manager, command::Command};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use crubaba::solvers::Semantics;
use std::io::Write;
use strum::IntoEnumIterator;

const CMD_NAME: &str = "semantics";

pub(crate) struct SemanticsCommand;

impl SemanticsCommand {
    pub(crate) fn new() -> Self {
        SemanticsCommand
    }
}

impl<'a> Command<'a> for SemanticsCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the names of the available semantics")
            .setting(AppSettings::DisableVersion)
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        let context = "while writing the semantics";
        let mut out = std::io::stdout();
        for s in Semantics::iter() {
            writeln!(out, "{}", s.as_ref()).context(context)?;
        }
        out.flush().context(context)
    }
}
