pub mod config;
pub mod project;
pub mod session;
pub mod task;

pub use config::*;
pub use project::*;
pub use session::*;
pub use task::*;
