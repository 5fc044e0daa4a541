use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use crubaba::{
    io::{ResponseWriter, TextWriter},
    solvers::Semantics,
};
use log::info;

const CMD_NAME: &str = "solve";

const ARG_TOP_K: &str = "TOP_K";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Computes the extensions of a framework")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::semantics_arg(true))
            .args(&common::engine_args())
            .arg(
                Arg::with_name(ARG_TOP_K)
                    .long("top-k")
                    .empty_values(false)
                    .multiple(false)
                    .help("only computes the k largest extensions (admissible and preferred semantics)")
                    .required(false),
            )
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
    let top_k = common::read_usize_arg(arg_matches, ARG_TOP_K)?;
    let mut computer = common::create_extension_computer(&framework, arg_matches)?;
    let mut out = std::io::stdout();
    if let Some(k) = top_k {
        let result = match semantics {
            Semantics::Admissible => computer.admissible_top_k(k)?,
            Semantics::Preferred => computer.preferred_top_k(k)?,
            _ => {
                return Err(anyhow!(
                    "top-k queries are only available for the admissible and preferred semantics"
                ))
            }
        };
        info!(
            "found {} extension(s); the largest admissible sets have {} assumption(s)",
            result.extensions.len(),
            result.max_size
        );
        if result.extensions.is_empty() {
            return writer.write_no_extension(&mut out);
        }
        return result
            .extensions
            .iter()
            .try_for_each(|e| writer.write_sized_extension(&mut out, &e.keys(&framework)));
    }
    let extensions = computer.extensions(semantics)?;
    info!("found {} extension(s)", extensions.len());
    let stats = computer.stats();
    info!(
        "visited {} node(s), called the SAT solver {} time(s), found {} candidate(s)",
        stats.n_nodes_visited, stats.n_solver_calls, stats.n_candidates
    );
    writer.write_extensions(
        &mut out,
        &extensions
            .iter()
            .map(|e| e.keys(&framework))
            .collect::<Vec<_>>(),
    )
}
