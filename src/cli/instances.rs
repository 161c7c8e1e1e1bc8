use super::common::{load_targets, program_stem, RunContext};
use super::error::CliError;
use super::parser::Cli;
use super::ui;
use crate::lifecycle::{LifecycleAction, LifecycleRunner, ResourceList};
use crate::runlog::{default_log_path, RunLog};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, instrument};

#[derive(Debug, Args)]
pub struct Instances {
    /// Action to send to every listed instance
    #[arg(value_enum)]
    action: LifecycleAction,

    /// File with one instance display name per line ('#' starts a comment)
    list_file: PathBuf,

    /// Compartment to search (defaults to the target map, then the tenancy)
    #[arg(long)]
    compartment: Option<String>,

    /// Run log location (defaults to ~/logs/<program>-instances.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Instances {
    #[instrument(name = "instances", skip(self, cli_args), fields(action = %self.action))]
    pub async fn run(&self, cli_args: &Cli) -> Result<(), CliError> {
        let log_path = self.log_path()?;
        let mut runlog = RunLog::open(&log_path)
            .map_err(|e| CliError::OperationFailed(format!("{:#}", e)))?;
        info!("Logging to {}", ui::format_highlight(&log_path.display().to_string()));
        ui::record(&mut runlog, "Program started ...");

        let (context, names) = match self.prepare(cli_args, &mut runlog).await {
            Ok(prepared) => prepared,
            Err(e) => {
                ui::record(&mut runlog, &format!("Error: {}", e));
                ui::close_runlog(runlog);
                return Err(e);
            }
        };
        let compartment_id = context.compartment_id(self.compartment.as_deref());
        ui::record(&mut runlog, &format!("Compartment: {}", compartment_id));

        let (sender, ui_task) = ui::spawn_event_consumer(None, Some(runlog));
        let runner = LifecycleRunner::new(Some(sender));
        let result = runner
            .run_instances(&context.client, &compartment_id, self.action, &names)
            .await;
        drop(runner);
        let runlog = ui::join_event_consumer(ui_task).await;

        let outcome = match result {
            Ok(outcomes) => {
                ui::print_outcomes(&outcomes);
                Ok(())
            }
            Err(e) => Err(CliError::from(e)),
        };

        if let Some(mut runlog) = runlog {
            if let Err(e) = &outcome {
                ui::record(&mut runlog, &format!("Error: {}", e));
            }
            ui::record(&mut runlog, "Program ended ...");
            ui::close_runlog(runlog);
        }
        outcome
    }

    fn log_path(&self) -> Result<PathBuf, CliError> {
        match &self.log_file {
            Some(path) => Ok(path.clone()),
            None => default_log_path(&program_stem(), "instances").ok_or_else(|| {
                CliError::UnsupportedPlatform(
                    "cannot determine the home directory for the run log".to_string(),
                )
            }),
        }
    }

    async fn prepare(
        &self,
        cli_args: &Cli,
        runlog: &mut RunLog,
    ) -> Result<(RunContext, ResourceList), CliError> {
        let targets = load_targets(cli_args)?;
        let context = RunContext::load(cli_args, targets)?;
        ui::record(runlog, "Config validated ...");
        ui::record(runlog, &format!("Client initialized for {} ...", context.region));

        let names = ResourceList::read(&self.list_file).await?;
        ui::record(
            runlog,
            &format!(
                "Instance list read from {} ({} entries) ...",
                self.list_file.display(),
                names.len()
            ),
        );
        ui::record(
            runlog,
            &format!("Action: {}", self.action.instance_action()),
        );
        Ok((context, names))
    }
}
