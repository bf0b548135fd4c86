pub mod session;

pub use session::{ExecutionState, Kernel, Session};
