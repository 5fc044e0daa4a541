use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use crubaba::io::{ResponseWriter, TextWriter};
use log::info;

const CMD_NAME: &str = "accept";

const ARG_ASSUMPTION: &str = "ASSUMPTION";
const ARG_SKEPTICAL: &str = "SKEPTICAL";
const ARG_WITH_CERTIFICATE: &str = "WITH_CERTIFICATE";

pub(crate) struct AcceptCommand;

impl AcceptCommand {
    pub(crate) fn new() -> Self {
        AcceptCommand
    }
}

impl<'a> Command<'a> for AcceptCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks the acceptance of an assumption")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::semantics_arg(true))
            .arg(
                Arg::with_name(ARG_ASSUMPTION)
                    .short("a")
                    .empty_values(false)
                    .multiple(false)
                    .help("the key of the assumption")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_SKEPTICAL)
                    .long("skeptical")
                    .takes_value(false)
                    .help("checks the skeptical acceptance instead of the credulous one")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_WITH_CERTIFICATE)
                    .long("with-certificate")
                    .takes_value(false)
                    .help("writes an extension witnessing the answer, if any")
                    .required(false),
            )
            .args(&common::engine_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        execute_with_writer(arg_matches, &TextWriter)
    }
}

fn execute_with_writer(arg_matches: &ArgMatches<'_>, writer: &dyn ResponseWriter) -> Result<()> {
    let file = arg_matches
        .value_of(common::ARG_INPUT)
        .ok_or_else(|| anyhow!("missing input file"))?;
    let framework = common::read_file_path(file)?;
    let semantics = common::read_semantics(arg_matches)?;
    let key = arg_matches
        .value_of(ARG_ASSUMPTION)
        .ok_or_else(|| anyhow!("missing assumption"))?;
    let skeptical = arg_matches.is_present(ARG_SKEPTICAL);
    let mut computer = common::create_extension_computer(&framework, arg_matches)?;
    let (status, certificate) = if skeptical {
        computer.is_skeptically_accepted_with_certificate(semantics, key)?
    } else {
        computer.is_credulously_accepted_with_certificate(semantics, key)?
    };
    info!(
        "{} is {}{} accepted",
        key,
        if status { "" } else { "not " },
        if skeptical { "skeptically" } else { "credulously" }
    );
    let mut out = std::io::stdout();
    writer.write_acceptance_status(&mut out, status)?;
    if arg_matches.is_present(ARG_WITH_CERTIFICATE) {
        if let Some(c) = certificate {
            writer.write_single_extension(&mut out, &c.keys(&framework))?;
        }
    }
    Ok(())
}
