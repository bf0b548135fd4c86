//! Idle determination
//!
//! A notebook is idle when the wall-clock time since its last recorded
//! activity is strictly greater than the configured threshold. With live
//! sessions, every session must be idle on its own: a busy kernel or an
//! attached client (unless connections are ignored) vetoes the shutdown.

use chrono::{DateTime, NaiveDateTime, Utc};
use std::time::Duration;

use crate::error::{AutostopError, Result};
use crate::models::{ExecutionState, Session};

/// Jupyter's `last_activity` layout, minus the trailing `Z`.
const ACTIVITY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Idle,
    NotIdle,
}

impl Decision {
    pub fn is_idle(self) -> bool {
        matches!(self, Decision::Idle)
    }
}

/// Outcome of evaluating a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionVerdict {
    Idle { last_activity: DateTime<Utc> },
    Recent { last_activity: DateTime<Utc> },
    Connected { connections: u32 },
    Active { state: ExecutionState },
}

impl SessionVerdict {
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionVerdict::Idle { .. })
    }
}

/// Parse a UTC activity timestamp such as `2026-10-19T08:15:42.123456Z`.
pub fn parse_activity_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value
        .trim()
        .trim_end_matches(|c: char| c == 'Z' || c == 'z');
    NaiveDateTime::parse_from_str(trimmed, ACTIVITY_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| AutostopError::Timestamp {
            value: value.to_string(),
            source,
        })
}

/// `now - last_activity > threshold`. Future timestamps are never idle.
pub fn is_idle(last_activity: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    match (now - last_activity).to_std() {
        Ok(elapsed) => elapsed > threshold,
        Err(_) => false,
    }
}

pub fn evaluate_session(
    session: &Session,
    now: DateTime<Utc>,
    threshold: Duration,
    ignore_connections: bool,
) -> Result<SessionVerdict> {
    let kernel = &session.kernel;
    if kernel.execution_state != ExecutionState::Idle {
        return Ok(SessionVerdict::Active {
            state: kernel.execution_state,
        });
    }

    if !ignore_connections && kernel.connections > 0 {
        return Ok(SessionVerdict::Connected {
            connections: kernel.connections,
        });
    }

    let last_activity = parse_activity_timestamp(&kernel.last_activity)?;
    if is_idle(last_activity, now, threshold) {
        Ok(SessionVerdict::Idle { last_activity })
    } else {
        Ok(SessionVerdict::Recent { last_activity })
    }
}

/// Evaluate every session and log each verdict; idle only if all are idle.
pub fn evaluate_sessions(
    sessions: &[Session],
    now: DateTime<Utc>,
    threshold: Duration,
    ignore_connections: bool,
) -> Result<Decision> {
    let mut decision = Decision::Idle;

    for session in sessions {
        let verdict = evaluate_session(session, now, threshold, ignore_connections)?;
        log_verdict(session, &verdict);
        if !verdict.is_idle() {
            decision = Decision::NotIdle;
        }
    }

    Ok(decision)
}

fn log_verdict(session: &Session, verdict: &SessionVerdict) {
    let notebook = session.label();
    match verdict {
        SessionVerdict::Idle { last_activity } => {
            tracing::info!(notebook, %last_activity, "Notebook is idle");
        }
        SessionVerdict::Recent { last_activity } => {
            tracing::info!(notebook, %last_activity, "Notebook is not idle");
        }
        SessionVerdict::Connected { connections } => {
            tracing::info!(notebook, connections, "Notebook is not idle: clients connected");
        }
        SessionVerdict::Active { state } => {
            tracing::info!(notebook, %state, "Notebook is not idle: kernel {}", state);
        }
    }
}
