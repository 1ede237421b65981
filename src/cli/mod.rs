mod args;

pub use args::{BackendArgs, Cli, Commands};
