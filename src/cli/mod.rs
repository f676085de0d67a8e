pub mod commands;
pub mod scan;
pub mod batch;
pub mod worker;
pub mod status;
pub mod logs;
pub mod validate;
pub mod index;

pub use commands::{Cli, Commands};
