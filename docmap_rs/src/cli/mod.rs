//! Command-line interface: `docmap scan` and `docmap generate`.
//!
//! - [`command`] holds the clap definitions
//! - [`dispatch`] loads config, builds the index and writes output
//! - [`entrypoint`] sets up logging and the runtime

pub mod command;
pub mod dispatch;
pub mod entrypoint;

pub use command::{Cli, Command, GenerateArgs, GlobalOptions, ScanArgs};
pub use dispatch::{load_config, summary};
