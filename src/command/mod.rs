mod mode;
mod resolve;

pub use mode::run_mode;
pub use resolve::run_resolve;
