use super::{instances, mysql, scale};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const VERSION_INFO: &str = env!("OCCCTL_BUILD_VERSION");

#[derive(Parser, Debug)]
#[command(name = "occctl")]
#[command(about = "Start, stop and scale Oracle Cloud resources", long_about = None, version = VERSION_INFO)]
#[command(propagate_version = true)]
pub struct Cli {
    /// OCI configuration file (defaults to ~/.oci/config)
    #[arg(short = 'c', long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Profile of the OCI configuration file to use
    #[arg(short = 'p', long, default_value = "DEFAULT", global = true)]
    pub profile: String,

    /// Target map with database names, compartment and endpoints (defaults to ~/.oci/occctl-targets.yaml)
    #[arg(short = 't', long = "targets", global = true)]
    pub targets_file: Option<PathBuf>,

    /// Region to call, overriding the target map and the profile
    #[arg(short = 'r', long, global = true)]
    pub region: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable the interactive progress spinner
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scale an Autonomous Database to a new ECPU count
    Scale(scale::Scale),

    /// Start or stop the compute instances named in a list file
    Instances(instances::Instances),

    /// Start or stop the MySQL DB systems listed in a file
    Mysql(mysql::Mysql),
}
