pub mod analyze;
pub mod branch;
pub mod cli;
pub mod compose;
pub mod error;
pub mod model;
pub mod runner;
pub mod source;
