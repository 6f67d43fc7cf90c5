//! Command dispatch: bridges CLI args -> controller intents and commands
//! -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod contacts;
pub mod dashboard;
pub mod inventory;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::session::Session;

/// Dispatch a command that needs a resumed backend session.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let session = Session::resume(global).await?;

    let result = match cmd {
        Command::Inventory(args) => inventory::handle(&session, args, global).await,
        Command::Dashboard(args) => dashboard::handle(&session, args, global).await,
        Command::Contacts(args) => contacts::handle(&session, args, global).await,
        // Auth, Config and Completions are handled before dispatch
        Command::Auth(_) | Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command does not need a session".into()))
        }
    };

    session.finish(global.quiet || result.is_err()).await;
    result
}
