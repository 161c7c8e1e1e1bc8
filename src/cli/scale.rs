use super::common::{load_targets, RunContext};
use super::error::CliError;
use super::parser::Cli;
use super::ui;
use crate::lifecycle::{LifecycleRunner, ScaleOutcome};
use clap::Args;
use tracing::{debug, info, instrument};

#[derive(Debug, Args)]
pub struct Scale {
    /// New ECPU count
    ecpu_count: String,

    /// Autonomous Database name from the target map (or its OCID)
    adb_name: String,
}

impl Scale {
    #[instrument(name = "scale", skip(self, cli_args), fields(adb = %self.adb_name))]
    pub async fn run(&self, cli_args: &Cli) -> Result<(), CliError> {
        let ecpus = parse_ecpu_count(&self.ecpu_count)?;

        let targets = load_targets(cli_args)?;
        let database_id =
            targets
                .resolve_database(&self.adb_name)
                .ok_or_else(|| CliError::InvalidName {
                    name: self.adb_name.clone(),
                    known: targets.database_names(),
                })?;
        debug!(id = %database_id, "Resolved Autonomous Database");

        let context = RunContext::load(cli_args, targets)?;

        let (sender, ui_task) = ui::spawn_event_consumer(None, None);
        let runner = LifecycleRunner::new(Some(sender));
        let result = runner
            .scale_autonomous_database(&context.client, &self.adb_name, &database_id, ecpus)
            .await;
        drop(runner);
        ui::join_event_consumer(ui_task).await;

        match result? {
            ScaleOutcome::Initiated {
                previous,
                requested,
            } => {
                info!(?previous, requested, "Scale request accepted");
            }
            ScaleOutcome::AlreadyAtScale { current } => {
                info!(current, "Nothing to change");
            }
        }
        Ok(())
    }
}

/// Parses the requested ECPU count. Only the type is checked here; the
/// service decides which counts it accepts.
pub fn parse_ecpu_count(raw: &str) -> Result<u32, CliError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| CliError::InvalidNumber(raw.to_string()))
}
