use super::{
    app_helper::{init_logger, init_logger_with_level},
    command::Command,
    writable_string::WritableString,
};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg};
use log::info;
use std::{ffi::OsString, str::FromStr};
use sysinfo::System;

/// Handles the set of commands and dispatches the CLI arguments to them.
pub(crate) struct CliManager<'a> {
    app_name: &'a str,
    version: &'a str,
    author: &'a str,
    about: &'a str,
    commands: Vec<Box<dyn Command<'a>>>,
}

pub(crate) const APP_HELPER_LOGGING_LEVEL_ARG: &str = "APP_HELPER_LOGGING_LEVEL_ARG";

pub(crate) fn logging_level_cli_arg<'a>() -> Arg<'a, 'a> {
    Arg::with_name(APP_HELPER_LOGGING_LEVEL_ARG)
        .long("logging-level")
        .multiple(false)
        .default_value("info")
        .possible_values(&["trace", "debug", "info", "warn", "error", "off"])
        .help("set the minimal logging level")
}

const HELP_STRINGS: [&str; 3] = ["help", "-h", "--help"];

impl<'a> CliManager<'a> {
    pub(crate) fn new(app_name: &'a str, version: &'a str, author: &'a str, about: &'a str) -> Self {
        CliManager {
            app_name,
            version,
            author,
            about,
            commands: vec![],
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a>>) {
        self.commands.push(command);
    }

    fn clap_app(&self) -> App<'a, 'a> {
        let app = App::new(self.app_name)
            .global_setting(AppSettings::DisableVersion)
            .global_setting(AppSettings::VersionlessSubcommands)
            .setting(AppSettings::NeedsSubcommandHelp)
            .setting(AppSettings::SubcommandRequired)
            .version(self.version)
            .author(self.author)
            .about(self.about);
        self.commands
            .iter()
            .fold(app, |app, c| app.subcommand(c.clap_subcommand()))
    }

    pub(crate) fn parse_cli<I, T>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let mut app = self.clap_app();
        match app.clone().get_matches_from_safe(args.iter()) {
            Ok(matches) => {
                let (name, sub_matches) = matches.subcommand();
                let command = self
                    .commands
                    .iter()
                    .find(|c| c.name() == name)
                    .ok_or_else(|| anyhow!(r#"unknown command "{}""#, name))?;
                let sub_matches = sub_matches
                    .ok_or_else(|| anyhow!(r#"missing arguments for command "{}""#, name))?;
                let log_level = match sub_matches.value_of(APP_HELPER_LOGGING_LEVEL_ARG) {
                    Some(l) => log::LevelFilter::from_str(l)
                        .with_context(|| format!(r#"invalid logging level "{}""#, l))?,
                    None => log::LevelFilter::Info,
                };
                init_logger_with_level(log_level);
                info!("{} {}", self.app_name, self.version);
                sys_info();
                command.execute(sub_matches)
            }
            Err(clap::Error {
                kind: clap::ErrorKind::HelpDisplayed,
                ..
            }) => {
                init_logger();
                self.print_help(&mut app, &args)
            }
            Err(e) => {
                init_logger();
                info!("{} {}", self.app_name, self.version);
                Err(anyhow!("{}", e))
            }
        }
    }

    fn print_help(&self, app: &mut App, args: &[OsString]) -> Result<()> {
        let words = args
            .iter()
            .skip(1)
            .take(2)
            .map(|a| a.to_string_lossy().to_string())
            .collect::<Vec<String>>();
        let requested = match words.as_slice() {
            [first, ..] if !HELP_STRINGS.contains(&first.as_str()) => Some(first.as_str()),
            [_, second] => Some(second.as_str()),
            _ => None,
        };
        let mut message = WritableString::default();
        let written = match requested.and_then(|r| self.commands.iter().find(|c| c.name() == r)) {
            Some(c) => c.clap_subcommand().write_long_help(&mut message),
            None => app.write_long_help(&mut message),
        };
        written.context("while writing the help message")?;
        message.to_string().lines().for_each(|s| info!("{}", s));
        info!("");
        Ok(())
    }
}

fn sys_info() {
    info!("----------------------------------------");
    let sys = System::new_all();
    let unknown = || "[unknown]".to_string();
    info!("running on {}", System::host_name().unwrap_or_else(unknown));
    info!(
        "OS is {} {} with kernel {}",
        System::name().unwrap_or_else(unknown),
        System::os_version().unwrap_or_else(unknown),
        System::kernel_version().unwrap_or_else(unknown)
    );
    let mut cpu_kinds: Vec<&str> = sys.cpus().iter().map(|p| p.brand()).collect();
    cpu_kinds.sort_unstable();
    cpu_kinds.dedup();
    info!(
        "physical core count: {} {:?}",
        sys.physical_core_count()
            .map(|n| n.to_string())
            .unwrap_or_else(unknown),
        cpu_kinds
    );
    info!("total memory: {} KB", sys.total_memory() / 1024);
    info!("----------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{ArgMatches, SubCommand};
    use std::{cell::RefCell, rc::Rc};

    struct RecordingCommand {
        executed: Rc<RefCell<bool>>,
        flag_set: Rc<RefCell<bool>>,
    }

    impl<'a> Command<'a> for RecordingCommand {
        fn name(&self) -> &str {
            "record"
        }

        fn clap_subcommand(&self) -> App<'a, 'a> {
            SubCommand::with_name("record")
                .about("records its calls")
                .arg(Arg::with_name("flag").short("x"))
                .arg(logging_level_cli_arg())
        }

        fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
            *self.executed.borrow_mut() = true;
            *self.flag_set.borrow_mut() = arg_matches.is_present("flag");
            Ok(())
        }
    }

    fn run(args: Vec<&'static str>) -> Result<(bool, bool)> {
        let mut manager = CliManager::new("app", "0.0.0", "someone", "a test app");
        let executed = Rc::new(RefCell::new(false));
        let flag_set = Rc::new(RefCell::new(false));
        manager.add_command(Box::new(RecordingCommand {
            executed: Rc::clone(&executed),
            flag_set: Rc::clone(&flag_set),
        }));
        manager.parse_cli(args)?;
        let result = (*executed.borrow(), *flag_set.borrow());
        Ok(result)
    }

    #[test]
    fn test_command_executed() {
        assert_eq!((true, false), run(vec!["app", "record"]).unwrap());
    }

    #[test]
    fn test_command_with_flag() {
        assert_eq!((true, true), run(vec!["app", "record", "-x"]).unwrap());
    }

    #[test]
    fn test_logging_level() {
        assert_eq!(
            (true, false),
            run(vec!["app", "record", "--logging-level", "off"]).unwrap()
        );
        assert!(run(vec!["app", "record", "--logging-level", "verbose"]).is_err());
    }

    #[test]
    fn test_no_subcommand() {
        assert!(run(vec!["app"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(run(vec!["app", "foo"]).is_err());
    }

    #[test]
    fn test_unknown_arg() {
        assert!(run(vec!["app", "record", "-y"]).is_err());
    }

    #[test]
    fn test_help() {
        assert_eq!((false, false), run(vec!["app", "-h"]).unwrap());
        assert_eq!((false, false), run(vec!["app", "help"]).unwrap());
        assert_eq!((false, false), run(vec!["app", "help", "record"]).unwrap());
        assert_eq!((false, false), run(vec!["app", "record", "-h"]).unwrap());
    }
}
