pub mod config;
pub mod error;
pub mod idle;
pub mod jupyter;
pub mod metadata;
pub mod models;
pub mod platform;
pub mod procedure;

pub use config::{RunConfig, Settings};
pub use error::AutostopError;
pub use idle::{Decision, SessionVerdict};
pub use jupyter::JupyterClient;
pub use platform::{AwsPlatform, NotebookPlatform};
pub use procedure::{run_once, DecisionSource, RunReport, TeardownAction};
