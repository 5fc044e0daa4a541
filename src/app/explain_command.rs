use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use crubaba::{
    explain::{DerivationDag, DerivationTree, DialecticalTree},
    io::{ResponseWriter, TextWriter},
};
use log::info;

const CMD_NAME: &str = "explain";

const ARG_GOAL: &str = "GOAL";
const ARG_DELTA: &str = "DELTA";
const ARG_ALL: &str = "ALL";
const ARG_DAG: &str = "DAG";
const ARG_MAX_PATHS: &str = "MAX_PATHS";
const ARG_DIALECTICAL: &str = "DIALECTICAL";
const ARG_MAX_DEPTH: &str = "MAX_DEPTH";

pub(crate) struct ExplainCommand;

impl ExplainCommand {
    pub(crate) fn new() -> Self {
        ExplainCommand
    }
}

impl<'a> Command<'a> for ExplainCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Explains why a set of assumptions derives a literal or defends an assumption")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(
                Arg::with_name(ARG_GOAL)
                    .short("g")
                    .empty_values(false)
                    .multiple(false)
                    .help("the literal to explain")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_DELTA)
                    .short("d")
                    .empty_values(false)
                    .multiple(true)
                    .number_of_values(1)
                    .help("an assumption of the set used for the explanation")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_ALL)
                    .long("all")
                    .takes_value(false)
                    .conflicts_with(ARG_DIALECTICAL)
                    .help("writes all the derivation trees")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_DAG)
                    .long("dag")
                    .takes_value(false)
                    .conflicts_with(ARG_DIALECTICAL)
                    .help("writes the graph merging all the derivation trees")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_MAX_PATHS)
                    .long("max-paths")
                    .empty_values(false)
                    .multiple(false)
                    .help("the maximal number of derivation trees")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_DIALECTICAL)
                    .long("dialectical")
                    .takes_value(false)
                    .requires(common::ARG_SEMANTICS)
                    .help("writes the dialectical tree of the goal instead of its derivations")
                    .required(false),
            )
            .arg(common::semantics_arg(false))
            .arg(
                Arg::with_name(ARG_MAX_DEPTH)
                    .long("max-depth")
                    .empty_values(false)
                    .multiple(false)
                    .requires(ARG_DIALECTICAL)
                    .help("the maximal depth of the dialectical tree")
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
    let goal = arg_matches
        .value_of(ARG_GOAL)
        .ok_or_else(|| anyhow!("missing goal"))?;
    let delta = common::read_assumption_set(&framework, arg_matches.values_of(ARG_DELTA))?;
    let mut computer = common::create_extension_computer(&framework, arg_matches)?;
    let mut out = std::io::stdout();
    if arg_matches.is_present(ARG_DIALECTICAL) {
        let semantics = common::read_semantics(arg_matches)?;
        let max_depth = common::read_usize_arg(arg_matches, ARG_MAX_DEPTH)?;
        let tree = DialecticalTree::build(&mut computer, &delta, goal, semantics, max_depth)?;
        info!(
            "the dialectical tree has {} node(s); the burden of the {} semantics is {}met",
            tree.root().n_nodes(),
            semantics.as_ref(),
            if tree.is_burden_met() { "" } else { "not " }
        );
        return writer.write_explanation(&mut out, &tree);
    }
    let max_paths = common::read_usize_arg(arg_matches, ARG_MAX_PATHS)?;
    if arg_matches.is_present(ARG_DAG) {
        let dag = DerivationDag::build(computer.reasoner(), &delta, goal, max_paths)?;
        info!(
            "the derivation graph has {} node(s) and {} edge(s)",
            dag.n_nodes(),
            dag.n_edges()
        );
        return writer.write_explanation(&mut out, &dag);
    }
    if arg_matches.is_present(ARG_ALL) {
        let trees = DerivationTree::build_all(computer.reasoner(), &delta, goal, max_paths)?;
        info!("found {} derivation tree(s)", trees.len());
        if trees.is_empty() {
            return writer.write_no_extension(&mut out);
        }
        return trees
            .iter()
            .try_for_each(|t| writer.write_explanation(&mut out, t));
    }
    match DerivationTree::build(computer.reasoner(), &delta, goal)? {
        Some(tree) => {
            info!("found a derivation tree with {} node(s)", tree.depth());
            writer.write_explanation(&mut out, &tree)
        }
        None => {
            info!("{} is not derivable from the given set", goal);
            writer.write_no_extension(&mut out)
        }
    }
}
