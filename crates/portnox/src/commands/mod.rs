//! Command dispatch: bridges CLI args -> provider operations -> output.

pub mod account;
pub mod address;
pub mod addresses;
pub mod config_cmd;
pub mod util;

use portnox_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Provider,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Account(args) => account::handle(provider, args, global).await,
        Command::Addresses(args) => addresses::handle(provider, args, global).await,
        Command::Address(args) => address::handle(provider, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
