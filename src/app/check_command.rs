use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::info;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks an input framework for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches
            .value_of(common::ARG_INPUT)
            .ok_or_else(|| anyhow!("missing input file"))?;
        let framework = common::read_file_path(file)?;
        for (fact, attacked) in framework.fact_attacks() {
            info!(
                "fact {} attacks {}",
                fact.key(),
                attacked.iter().map(|a| a.key()).collect::<Vec<_>>().join(", ")
            );
        }
        info!("the framework is valid");
        Ok(())
    }
}
