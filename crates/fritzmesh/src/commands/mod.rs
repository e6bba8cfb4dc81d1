//! Command dispatch: bridges CLI args -> coordinator snapshots -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod hubs;
pub mod topology;
pub mod util;
pub mod watch;

use fritzmesh_core::{Coordinator, Source};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a source-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator<Source>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Topology => topology::handle(coordinator, global).await,
        Command::Hubs(args) => hubs::handle(coordinator, args, global).await,
        Command::Clients(args) => clients::handle(coordinator, args, global).await,
        Command::Watch(_) => watch::handle(coordinator, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
