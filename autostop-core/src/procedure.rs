//! Single autostop pass: evaluate idleness, then tear down if idle.
//!
//! Runs once per invocation; an external scheduler provides the repetition.

use chrono::{DateTime, Utc};

use crate::config::RunConfig;
use crate::error::Result;
use crate::idle::{self, Decision};
use crate::jupyter::JupyterClient;
use crate::metadata;
use crate::platform::NotebookPlatform;

/// Where the decision came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionSource {
    Sessions { count: usize },
    LastModified {
        instance: String,
        last_modified: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownAction {
    DeletedDevEndpoint(String),
    StoppedNotebook(String),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub source: DecisionSource,
    pub decision: Decision,
    pub actions: Vec<TeardownAction>,
}

pub async fn run_once<P>(
    config: &RunConfig,
    jupyter: &JupyterClient,
    platform: &P,
    now: DateTime<Utc>,
) -> Result<RunReport>
where
    P: NotebookPlatform + ?Sized,
{
    let paths = &config.settings.paths;
    let sessions = jupyter.list_sessions().await?;

    let (source, decision) = if sessions.is_empty() {
        let instance = metadata::notebook_instance_name(&paths.metadata_file)?;
        tracing::info!(
            instance = %instance,
            platform = platform.name(),
            "No active sessions, falling back to instance last modified time"
        );
        let last_modified = platform.last_modified_time(&instance).await?;
        let decision = if idle::is_idle(last_modified, now, config.threshold) {
            tracing::info!(%last_modified, "Notebook is idle");
            Decision::Idle
        } else {
            tracing::info!(%last_modified, "Notebook is not idle");
            Decision::NotIdle
        };
        (
            DecisionSource::LastModified {
                instance,
                last_modified,
            },
            decision,
        )
    } else {
        let decision = idle::evaluate_sessions(
            &sessions,
            now,
            config.threshold,
            config.ignore_connections,
        )?;
        (
            DecisionSource::Sessions {
                count: sessions.len(),
            },
            decision,
        )
    };

    let mut actions = Vec::new();
    if !decision.is_idle() {
        tracing::info!("Notebook not idle. Pass.");
        return Ok(RunReport {
            source,
            decision,
            actions,
        });
    }

    let endpoint = metadata::dev_endpoint_name(&paths.endpoint_script)?;
    tracing::info!(endpoint = %endpoint, "Deleting idle dev endpoint");
    platform.delete_dev_endpoint(&endpoint).await?;
    actions.push(TeardownAction::DeletedDevEndpoint(endpoint));

    let instance = match &source {
        DecisionSource::LastModified { instance, .. } => instance.clone(),
        DecisionSource::Sessions { .. } => metadata::notebook_instance_name(&paths.metadata_file)?,
    };
    tracing::info!(instance = %instance, "Closing idle notebook");
    platform.stop_notebook_instance(&instance).await?;
    actions.push(TeardownAction::StoppedNotebook(instance));

    Ok(RunReport {
        source,
        decision,
        actions,
    })
}
