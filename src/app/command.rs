use anyhow::Result;
use clap::{App, ArgMatches};

/// A subcommand of the command line tool.
///
/// A command declares its arguments as a clap subcommand and runs itself given the parsed values.
/// The names of the commands registered in an app must be distinct.
pub(crate) trait Command<'a> {
    /// The name under which the command is invoked.
    fn name(&self) -> &str;

    /// The clap description of the command and its arguments.
    fn clap_subcommand(&self) -> App<'a, 'a>;

    /// Runs the command on the arguments matched by clap.
    ///
    /// Returning an error makes the app exit with a failure status.
    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()>;
}
