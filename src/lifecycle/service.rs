use super::{
    targets::ResourceList,
    types::{
        LifecycleAction, LifecycleError, LifecycleEvent, LifecycleResult, ScaleOutcome,
        TargetOutcome,
    },
    wait::WaitPolicy,
};
use crate::config::is_ocid;
use crate::provider::{
    ComputeService, DatabaseService, Instance, LifecycleState, MySqlService, ShutdownType,
};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Issues lifecycle actions against the provider, one target at a time, and
/// reports progress through an optional event channel.
pub struct LifecycleRunner {
    progress_sender: Option<mpsc::Sender<LifecycleEvent>>,
    wait_policy: Option<WaitPolicy>,
}

impl LifecycleRunner {
    pub fn new(progress_sender: Option<mpsc::Sender<LifecycleEvent>>) -> Self {
        Self {
            progress_sender,
            wait_policy: Some(WaitPolicy::default()),
        }
    }

    /// `None` returns right after an action is accepted instead of waiting
    /// for the resource to settle.
    pub fn with_wait_policy(mut self, wait_policy: Option<WaitPolicy>) -> Self {
        self.wait_policy = wait_policy;
        self
    }

    async fn send_event(&self, event: LifecycleEvent) {
        if let Some(sender) = &self.progress_sender {
            if let Err(e) = sender.send(event).await {
                tracing::warn!("Failed to send progress event: {}", e);
            }
        }
    }

    async fn fail(&self, target: &str, error: LifecycleError) -> LifecycleError {
        tracing::error!("❌ {}: {}", target, error);
        self.send_event(LifecycleEvent::TargetFailed {
            target: target.to_string(),
            error: error.to_string(),
        })
        .await;
        error
    }

    /// Reports the current ECPU count of an Autonomous Database, then requests
    /// `ecpus`. A rejection because nothing would change is a no-op, not an error.
    pub async fn scale_autonomous_database(
        &self,
        database: &dyn DatabaseService,
        name: &str,
        id: &str,
        ecpus: u32,
    ) -> LifecycleResult<ScaleOutcome> {
        tracing::info!("Fetching Autonomous Database {} ({})", name, id);
        let current = match database.get_autonomous_database(id).await {
            Ok(current) => current,
            Err(e) => return Err(self.fail(name, e.into()).await),
        };
        let previous = current.ecpu_count();
        if let Some(ecpus) = previous {
            self.send_event(LifecycleEvent::CurrentCapacity {
                target: name.to_string(),
                ecpus,
            })
            .await;
        }
        tracing::debug!(state = %current.lifecycle_state, "Autonomous Database state");

        self.send_event(LifecycleEvent::ScaleRequested {
            target: name.to_string(),
            ecpus,
        })
        .await;

        match database.update_compute_count(id, ecpus).await {
            Ok(_) => {
                self.send_event(LifecycleEvent::TargetCompleted {
                    target: name.to_string(),
                    message: "Scaling operation initiated successfully ...".to_string(),
                })
                .await;
                Ok(ScaleOutcome::Initiated {
                    previous,
                    requested: ecpus,
                })
            }
            Err(e) if e.is_no_change() || (previous == Some(ecpus) && e.is_client_error()) => {
                tracing::debug!("Update rejected as a no-op: {}", e);
                self.send_event(LifecycleEvent::TargetCompleted {
                    target: name.to_string(),
                    message: "Scaling not needed because current configuration already at requested scale ...".to_string(),
                })
                .await;
                Ok(ScaleOutcome::AlreadyAtScale { current: ecpus })
            }
            Err(e) => Err(self.fail(name, e.into()).await),
        }
    }

    /// Sends START or SOFTSTOP to every live instance whose display name is
    /// listed, following the order of `names`.
    pub async fn run_instances(
        &self,
        compute: &dyn ComputeService,
        compartment_id: &str,
        action: LifecycleAction,
        names: &ResourceList,
    ) -> LifecycleResult<Vec<TargetOutcome>> {
        self.send_event(LifecycleEvent::TargetsLoaded(names.entries().to_vec()))
            .await;
        if names.is_empty() {
            tracing::info!("Instance list is empty, nothing to do.");
            return Ok(Vec::new());
        }

        let instances = compute.list_instances(compartment_id).await?;
        tracing::info!(
            "Found {} instance(s) in compartment {}",
            instances.len(),
            compartment_id
        );

        let instance_action = action.instance_action();
        let mut outcomes = Vec::with_capacity(names.len());

        for name in names.entries() {
            let matches = live_instances_named(&instances, name);
            if matches.is_empty() {
                let reason = "no instance with this display name in the compartment";
                self.send_event(LifecycleEvent::TargetSkipped {
                    target: name.clone(),
                    reason: reason.to_string(),
                })
                .await;
                outcomes.push(TargetOutcome {
                    target: name.clone(),
                    result: Err(LifecycleError::NotFound(format!("{}: {}", name, reason))),
                });
                continue;
            }

            for instance in matches {
                self.send_event(LifecycleEvent::CurrentState {
                    target: name.clone(),
                    state: instance.lifecycle_state.clone(),
                })
                .await;

                let result = match compute.instance_action(&instance.id, instance_action).await {
                    Ok(_) => {
                        let message =
                            format!("Sent {} command to instance : {}", instance_action, name);
                        self.send_event(LifecycleEvent::TargetCompleted {
                            target: name.clone(),
                            message: message.clone(),
                        })
                        .await;
                        Ok(message)
                    }
                    Err(e) => Err(self.fail(name, e.into()).await),
                };
                outcomes.push(TargetOutcome {
                    target: name.clone(),
                    result,
                });
            }
        }

        Ok(outcomes)
    }

    /// Starts or stops each listed MySQL DB system and, unless waiting is
    /// disabled, blocks until it settles. Failures never stop the batch.
    pub async fn run_mysql(
        &self,
        mysql: &dyn MySqlService,
        action: LifecycleAction,
        ids: &ResourceList,
    ) -> Vec<TargetOutcome> {
        self.send_event(LifecycleEvent::TargetsLoaded(ids.entries().to_vec()))
            .await;

        let mut outcomes = Vec::with_capacity(ids.len());
        for id in ids.entries() {
            let result = self.mysql_target(mysql, action, id).await;
            outcomes.push(TargetOutcome {
                target: id.clone(),
                result,
            });
        }
        outcomes
    }

    async fn mysql_target(
        &self,
        mysql: &dyn MySqlService,
        action: LifecycleAction,
        id: &str,
    ) -> LifecycleResult<String> {
        if !is_ocid(id) {
            return Err(self
                .fail(id, LifecycleError::InvalidTarget(id.to_string()))
                .await);
        }

        match mysql.get_db_system(id).await {
            Ok(db_system) => {
                self.send_event(LifecycleEvent::CurrentState {
                    target: id.to_string(),
                    state: db_system.lifecycle_state,
                })
                .await;
            }
            Err(e) => tracing::warn!("Could not read current state of {}: {}", id, e),
        }

        let (label, request) = match action {
            LifecycleAction::Start => ("start", mysql.start_db_system(id)),
            LifecycleAction::Stop => (
                "stop (SLOW shutdown)",
                mysql.stop_db_system(id, ShutdownType::Slow),
            ),
        };
        self.send_event(LifecycleEvent::ActionRequested {
            target: id.to_string(),
            action: label.to_string(),
        })
        .await;

        let receipt = match request.await {
            Ok(receipt) => receipt,
            Err(e) => return Err(self.fail(id, e.into()).await),
        };
        self.send_event(LifecycleEvent::ActionAccepted {
            target: id.to_string(),
            receipt,
        })
        .await;

        let message = match &self.wait_policy {
            Some(policy) => {
                let expected = action.mysql_target_states();
                match self.wait_for_db_system(mysql, id, expected, policy).await {
                    Ok(state) => format!("MySQL DB System {} is now {}.", id, state),
                    Err(e) => return Err(self.fail(id, e).await),
                }
            }
            None => format!("MySQL DB System {}: {} initiated.", id, action),
        };

        self.send_event(LifecycleEvent::TargetCompleted {
            target: id.to_string(),
            message: message.clone(),
        })
        .await;
        Ok(message)
    }

    /// Polls a DB system until it reports one of `expected`, following `policy`.
    pub async fn wait_for_db_system(
        &self,
        mysql: &dyn MySqlService,
        id: &str,
        expected: &[&str],
        policy: &WaitPolicy,
    ) -> LifecycleResult<LifecycleState> {
        let started = Instant::now();
        let expected_label = expected.join("|");
        let mut delay = policy.initial_delay;
        let mut attempt = 0;
        let mut last: Option<LifecycleState> = None;

        loop {
            match policy.sleep_for(delay, started.elapsed()) {
                Some(pause) => {
                    tracing::debug!("Polling {} in {:?}", id, pause);
                    tokio::time::sleep(pause).await;
                }
                None => {
                    return Err(LifecycleError::Timeout {
                        target: id.to_string(),
                        expected: expected_label,
                        last: last.map_or_else(|| "unknown".to_string(), |s| s.to_string()),
                        waited: started.elapsed(),
                    });
                }
            }
            delay = policy.next_delay(delay);

            attempt += 1;
            let db_system = mysql.get_db_system(id).await?;
            let state = db_system.lifecycle_state;
            self.send_event(LifecycleEvent::WaitAttempt {
                target: id.to_string(),
                expected: expected_label.clone(),
                attempt,
                state: state.clone(),
            })
            .await;

            if state.is_any(expected) {
                return Ok(state);
            }
            if state.is(LifecycleState::FAILED) {
                return Err(LifecycleError::UnexpectedState {
                    target: id.to_string(),
                    expected: expected_label,
                    state,
                });
            }
            last = Some(state);
        }
    }
}

fn live_instances_named<'a>(instances: &'a [Instance], name: &str) -> Vec<&'a Instance> {
    instances
        .iter()
        .filter(|i| i.display_name == name)
        .filter(|i| {
            !i.lifecycle_state
                .is_any(&[LifecycleState::TERMINATED, LifecycleState::TERMINATING])
        })
        .collect()
}
