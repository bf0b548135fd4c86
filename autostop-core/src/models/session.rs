use serde::Deserialize;
use std::fmt;

/// One entry of the Jupyter `GET /api/sessions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub kernel: Kernel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Kernel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub execution_state: ExecutionState,
    #[serde(default)]
    pub connections: u32,
    pub last_activity: String,
}

/// Kernel execution state as reported by the notebook server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    Idle,
    Busy,
    Starting,
    #[serde(other)]
    Other,
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionState::Idle => "idle",
            ExecutionState::Busy => "busy",
            ExecutionState::Starting => "starting",
            ExecutionState::Other => "other",
        };
        f.write_str(s)
    }
}

impl Session {
    /// Label used in log lines: notebook path when known, else the session id.
    pub fn label(&self) -> &str {
        self.path
            .as_deref()
            .or(self.name.as_deref())
            .or(self.id.as_deref())
            .unwrap_or("<unnamed>")
    }
}
