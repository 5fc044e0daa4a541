use super::{
    app_helper::AppHelper, command::Command, AcceptCommand, AuthorsCommand, CheckCommand,
    ExplainCommand, SemanticsCommand, SolveCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use crubaba::{
    aba::{AssumptionSet, BipolarABAFramework},
    io::{BundleReader, InstanceReader},
    sat::{DefaultSatSolverFactory, SatSolver, SatSolverFactory, SolvingListener, SolvingResult},
    solvers::{EngineKind, EnumerationOptions, ExtensionComputer, LoggingSearchListener, Semantics},
};
use log::{info, warn};
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::PathBuf,
    rc::Rc,
    str::FromStr,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "Crubaba, a reasoner for bipolar assumption-based argumentation frameworks.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AcceptCommand::new()),
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(CheckCommand::new()),
        Box::new(ExplainCommand::new()),
        Box::new(SemanticsCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the bipolar ABA framework")
        .required(true)
}

pub(crate) const ARG_SEMANTICS: &str = "SEMANTICS";

pub(crate) fn semantics_arg(required: bool) -> Arg<'static, 'static> {
    Arg::with_name(ARG_SEMANTICS)
        .short("s")
        .long("semantics")
        .empty_values(false)
        .multiple(false)
        .help("the semantics (see the semantics command for the available names)")
        .required(required)
}

pub(crate) fn read_semantics(arg_matches: &ArgMatches<'_>) -> Result<Semantics> {
    let name = arg_matches
        .value_of(ARG_SEMANTICS)
        .ok_or_else(|| anyhow!("missing semantics"))?;
    let semantics = Semantics::from_name(name)?;
    info!("semantics is {}", semantics.as_ref());
    Ok(semantics)
}

const ARG_ENGINE: &str = "ENGINE";
const ARG_NO_CLOSURE_IMPLICATIONS: &str = "NO_CLOSURE_IMPLICATIONS";

pub(crate) fn engine_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_ENGINE)
            .long("engine")
            .empty_values(false)
            .multiple(false)
            .possible_values(&["exhaustive", "sat"])
            .default_value("sat")
            .help("the algorithm used to enumerate the extensions")
            .required(false),
        Arg::with_name(ARG_NO_CLOSURE_IMPLICATIONS)
            .long("no-closure-implications")
            .takes_value(false)
            .help("do not add the closure implications to the SAT encoding")
            .required(false),
    ]
}

pub(crate) fn read_enumeration_options(arg_matches: &ArgMatches<'_>) -> Result<EnumerationOptions> {
    let engine = match arg_matches.value_of(ARG_ENGINE) {
        Some(e) => EngineKind::from_str(e).with_context(|| format!(r#"unknown engine "{}""#, e))?,
        None => EngineKind::Sat,
    };
    let options = EnumerationOptions::default()
        .with_engine(engine)
        .with_closure_implications(!arg_matches.is_present(ARG_NO_CLOSURE_IMPLICATIONS));
    info!(
        "using the {} engine{}",
        options.engine.as_ref(),
        if options.engine == EngineKind::Sat && !options.use_closure_implications {
            " without closure implications"
        } else {
            ""
        }
    );
    Ok(options)
}

pub(crate) fn create_extension_computer<'a>(
    framework: &'a BipolarABAFramework,
    arg_matches: &ArgMatches<'_>,
) -> Result<ExtensionComputer<'a>> {
    let options = read_enumeration_options(arg_matches)?;
    let mut computer = ExtensionComputer::new_with_options(framework, options);
    computer.set_sat_solver_factory(Box::new(LoggingSatSolverFactory));
    computer.add_search_listener(Rc::new(LoggingSearchListener));
    Ok(computer)
}

pub(crate) fn read_file_path(file_path: &str) -> Result<BipolarABAFramework> {
    let mut reader = BundleReader::default();
    reader.add_warning_handler(Box::new(|line, msg| warn!("at line {}: {}", line, msg)));
    let framework = read_file_path_with(file_path, &|r| reader.read(r))?;
    info!(
        "the framework has {} assumption(s) (including {} fact(s)) and {} rule(s) (including {} attack rule(s))",
        framework.n_assumptions(),
        framework.iter_facts().count(),
        framework.n_rules(),
        framework.n_attack_rules(),
    );
    Ok(framework)
}

pub(crate) fn read_file_path_with<F, R>(file_path: &str, reader: &F) -> Result<R>
where
    F: Fn(&mut dyn Read) -> Result<R>,
{
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(
        File::open(&canonicalized)
            .with_context(|| format!("while opening file {:?}", canonicalized))?,
    );
    (reader)(&mut file_reader)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

/// Reads a set of assumptions given by their keys on the command line.
pub(crate) fn read_assumption_set(
    framework: &BipolarABAFramework,
    keys: Option<clap::Values<'_>>,
) -> Result<AssumptionSet> {
    let keys = keys.map(|v| v.collect::<Vec<&str>>()).unwrap_or_default();
    framework
        .assumption_set(&keys)
        .context("while reading the set of assumptions passed to the command line")
}

pub(crate) fn read_usize_arg(arg_matches: &ArgMatches<'_>, arg: &str) -> Result<Option<usize>> {
    arg_matches
        .value_of(arg)
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!(r#"expected a non-negative integer, got "{}""#, s))
        })
        .transpose()
}

#[derive(Default)]
struct LoggingSatSolverFactory;

impl SatSolverFactory for LoggingSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = DefaultSatSolverFactory.new_solver();
        solver.add_listener(Box::<SatSolvingLogger>::default());
        solver
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        log::debug!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars,
            n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        let r = match result {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        };
        log::debug!("SAT solver ended with result {}", r);
    }
}
