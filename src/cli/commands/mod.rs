//! One module per subcommand, each exposing an `execute` function.

pub mod completions;
pub mod create;
pub mod delete;
pub mod generate;
pub mod get;
pub mod history;
pub mod init;
pub mod list;
