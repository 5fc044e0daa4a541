mod accept_command;
pub(crate) use accept_command::AcceptCommand;

mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

mod cli_manager;

mod command;

pub(crate) mod common;

mod explain_command;
pub(crate) use explain_command::ExplainCommand;

mod semantics_command;
pub(crate) use semantics_command::SemanticsCommand;

mod solve_command;
pub(crate) use solve_command::SolveCommand;

mod writable_string;
