mod common;
pub mod error;
mod instances;
mod mysql;
pub mod parser;
mod scale;
mod ui;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use error::CliError;
use parser::Cli;

/// Parses the command line. Help and version requests exit immediately;
/// every other parse failure is a usage error.
pub fn parse_args() -> Result<Cli, CliError> {
    parse_from(std::env::args_os())
}

pub fn parse_from<I, T>(args: I) -> Result<Cli, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ClapErrorKind::DisplayHelp
        | ClapErrorKind::DisplayVersion
        | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
        _ => CliError::Usage(e.render().to_string()),
    })
}

// Main CLI execution function, receives parsed args
pub async fn run(cli: Cli) -> Result<(), CliError> {
    match &cli.command {
        parser::Commands::Scale(cmd) => cmd.run(&cli).await,
        parser::Commands::Instances(cmd) => cmd.run(&cli).await,
        parser::Commands::Mysql(cmd) => cmd.run(&cli).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleAction;
    use parser::Commands;

    #[test]
    fn test_parse_scale() {
        let cli = parse_from(["occctl", "-p", "PROD", "scale", "8", "MY_PROD_ADB"]).unwrap();
        assert_eq!(cli.profile, "PROD");
        assert!(matches!(cli.command, Commands::Scale(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse_from([
            "occctl",
            "mysql",
            "stop",
            "dbs.txt",
            "--no-wait",
            "--region",
            "eu-frankfurt-1",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.region.as_deref(), Some("eu-frankfurt-1"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Mysql(_)));
    }

    #[test]
    fn test_missing_arguments_are_usage_errors() {
        let err = parse_from(["occctl", "scale", "4"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), 3);

        let err = parse_from(["occctl", "instances", "start"]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_unknown_action_is_usage_error() {
        let err = parse_from(["occctl", "instances", "reboot", "list.txt"]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_action_value_enum() {
        let cli = parse_from(["occctl", "instances", "stop", "list.txt"]).unwrap();
        match cli.command {
            Commands::Instances(_) => {}
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(LifecycleAction::Stop.to_string(), "stop");
    }
}
