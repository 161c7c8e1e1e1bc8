use crate::lifecycle::{LifecycleEvent, TargetOutcome};
use crate::runlog::RunLog;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const EVENT_BUFFER: usize = 32;

/// Creates a standard spinner ProgressBar.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▹▹▹▹▹",
            "▸▹▹▹▹",
            "▹▸▹▹▹",
            "▹▹▸▹▹",
            "▹▹▹▸▹",
            "▹▹▹▹▸",
            "▪▪▪▪▪",
        ]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Spawns the task that prints lifecycle events (and copies them to the run
/// log). The task ends once every sender is dropped and hands the log back.
pub fn spawn_event_consumer(
    pb: Option<ProgressBar>,
    runlog: Option<RunLog>,
) -> (
    mpsc::Sender<LifecycleEvent>,
    JoinHandle<Option<RunLog>>,
) {
    let (sender, receiver) = mpsc::channel::<LifecycleEvent>(EVENT_BUFFER);
    let task = tokio::spawn(handle_lifecycle_events(receiver, pb, runlog));
    (sender, task)
}

pub async fn join_event_consumer(task: JoinHandle<Option<RunLog>>) -> Option<RunLog> {
    match task.await {
        Ok(runlog) => runlog,
        Err(e) => {
            tracing::error!("UI update task failed: {}", e);
            None
        }
    }
}

/// Handles receiving LifecycleEvents, printing them and updating the spinner.
pub async fn handle_lifecycle_events(
    mut receiver: mpsc::Receiver<LifecycleEvent>,
    pb: Option<ProgressBar>,
    mut runlog: Option<RunLog>,
) -> Option<RunLog> {
    while let Some(event) = receiver.recv().await {
        let text = event.to_string();
        if let Some(log) = runlog.as_mut() {
            record(log, &text);
        }

        match &event {
            LifecycleEvent::WaitAttempt { .. } => match &pb {
                Some(pb) => pb.set_message(format!("⏳ {}", text)),
                None => tracing::info!("{}", text),
            },
            LifecycleEvent::TargetsLoaded(targets) if targets.is_empty() => {
                emit(pb.as_ref(), &format_warning("(No targets listed)"), false);
            }
            LifecycleEvent::TargetsLoaded(_) => {
                emit(pb.as_ref(), &format!("Targets: {}", format_highlight(&text)), false);
            }
            LifecycleEvent::TargetCompleted { .. } => {
                emit(pb.as_ref(), &format_success(&text), false);
            }
            LifecycleEvent::TargetSkipped { .. } => {
                emit(pb.as_ref(), &format_warning(&text), false);
            }
            e if e.is_failure() => emit(pb.as_ref(), &format_error(&text), true),
            _ => emit(pb.as_ref(), &text, false),
        }
    }
    runlog
}

fn emit(pb: Option<&ProgressBar>, line: &str, to_stderr: bool) {
    match pb {
        Some(pb) => pb.println(line),
        None if to_stderr => eprintln!("{}", line),
        None => println!("{}", line),
    }
}

/// Appends to the run log; a failing log never aborts the command.
pub fn record(runlog: &mut RunLog, message: &str) {
    if let Err(e) = runlog.log(message) {
        tracing::warn!("Could not write run log: {:#}", e);
    }
}

pub fn close_runlog(runlog: RunLog) {
    let path = runlog.path().display().to_string();
    if let Err(e) = runlog.finish() {
        tracing::warn!("Could not finish run log {}: {:#}", path, e);
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

/// Per-target results of a batch command.
pub fn print_outcomes(outcomes: &[TargetOutcome]) {
    if outcomes.is_empty() {
        return;
    }

    let rows: Vec<OutcomeRow> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(message) => OutcomeRow {
                target: format_highlight(&outcome.target),
                result: format_success("ok"),
                detail: message.clone(),
            },
            Err(e) => OutcomeRow {
                target: format_highlight(&outcome.target),
                result: format_error(&format!("{:?}", e.kind()).to_lowercase()),
                detail: e.to_string(),
            },
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_GREEN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    println!("\n{}", format_header("Results:"));
    println!("{}", table);
}

pub fn timestamp() -> String {
    chrono::Local::now().format("%m/%d/%Y, %H:%M:%S").to_string()
}

pub fn format_header(text: &str) -> String {
    format!("{}", text.blue().bold())
}

pub fn format_highlight(text: &str) -> String {
    format!("{}", text.cyan())
}

pub fn format_success(text: &str) -> String {
    format!("{}", text.green())
}

pub fn format_warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn format_error(text: &str) -> String {
    format!("{}", text.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_events_are_copied_to_run_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("instances.log");
        let runlog = RunLog::open(&path).unwrap();

        let (sender, task) = spawn_event_consumer(None, Some(runlog));
        sender
            .send(LifecycleEvent::TargetCompleted {
                target: "web-01".to_string(),
                message: "Sent START command to instance : web-01".to_string(),
            })
            .await
            .unwrap();
        drop(sender);

        let runlog = join_event_consumer(task).await.unwrap();
        close_runlog(runlog);

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Sent START command to instance : web-01"));
    }
}
