use super::{cli_manager, command::Command};
use anyhow::{Context, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use std::io::Write;

const CMD_NAME: &str = "authors";

pub(crate) struct AuthorsCommand<'a> {
    app_name: &'a str,
    app_version: &'a str,
    authors: &'a str,
}

impl<'a> AuthorsCommand<'a> {
    pub(crate) fn new(app_name: &'a str, app_version: &'a str, authors: &'a str) -> Self {
        AuthorsCommand {
            app_name,
            app_version,
            authors,
        }
    }
}

impl<'a> Command<'a> for AuthorsCommand<'a> {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the app version and its authors")
            .setting(AppSettings::DisableVersion)
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        let context = "while writing the authors";
        let mut out = std::io::stdout();
        writeln!(out, "{} {}", self.app_name, self.app_version).context(context)?;
        writeln!(out, "{}", self.authors.replace(':', ", ")).context(context)?;
        out.flush().context(context)
    }
}
