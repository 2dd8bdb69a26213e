pub mod cli;
pub mod io;
pub mod model;
pub mod query;
pub mod service;
pub mod tui;
