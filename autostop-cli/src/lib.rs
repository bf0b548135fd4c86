pub mod args;

pub use args::{parse_args, ArgsError, Invocation};
