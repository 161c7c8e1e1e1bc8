use super::common::{load_targets, RunContext};
use super::error::CliError;
use super::parser::Cli;
use super::ui;
use crate::lifecycle::{LifecycleAction, LifecycleRunner, ResourceList, WaitPolicy};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Args)]
pub struct Mysql {
    /// Action to perform on every listed DB system
    #[arg(value_enum)]
    action: LifecycleAction,

    /// File with one DB system OCID per line ('#' starts a comment)
    list_file: PathBuf,

    /// Seconds to wait for each DB system to reach its target state
    #[arg(long, default_value_t = 1800)]
    wait_timeout: u64,

    /// Return once each action is accepted, without waiting for the final state
    #[arg(long)]
    no_wait: bool,
}

impl Mysql {
    #[instrument(name = "mysql", skip(self, cli_args), fields(action = %self.action))]
    pub async fn run(&self, cli_args: &Cli) -> Result<(), CliError> {
        println!("Program started ...");
        println!("{}", ui::timestamp());

        let targets = load_targets(cli_args)?;
        let context = RunContext::load(cli_args, targets)?;
        println!("Config validated ...");

        let ids = ResourceList::read(&self.list_file).await?;
        println!("MySQL list read from file ...");
        println!(
            "MySQL instances being put in the {} state ...",
            ui::format_highlight(&self.action.to_string())
        );

        let wait_policy = (!self.no_wait)
            .then(|| WaitPolicy::with_timeout(Duration::from_secs(self.wait_timeout)));
        let pb = (wait_policy.is_some() && !cli_args.no_progress && !ids.is_empty())
            .then(|| ui::create_spinner("Working on MySQL DB systems..."));
        if pb.is_none() {
            info!("Progress spinner disabled.");
        }

        let (sender, ui_task) = ui::spawn_event_consumer(pb.clone(), None);
        let runner = LifecycleRunner::new(Some(sender)).with_wait_policy(wait_policy);
        let outcomes = runner.run_mysql(&context.client, self.action, &ids).await;
        drop(runner);
        ui::join_event_consumer(ui_task).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        ui::print_outcomes(&outcomes);
        println!("{}", ui::timestamp());
        println!("Program ended ...");
        Ok(())
    }
}
