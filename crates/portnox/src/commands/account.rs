//! Account command handlers.

use tracing::info;

use portnox_core::{AccountConfig, AccountState, Provider, ReadOutcome};

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn print_state(state: &AccountState, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(
        &global.output,
        state,
        |s| output::account_detail(&s.account),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    provider: &Provider,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Create { declared, state } => {
            let config: AccountConfig = util::read_declared(&declared.file)?;
            let created = provider.create_account(&config).await?;
            util::write_state(&state.state, &created)?;
            print_state(&created, global)
        }

        AccountCommand::Get { state, file } => {
            let previous: AccountState = util::read_state(&state.state)?;
            let declared = match file {
                Some(path) => util::read_declared(&path)?,
                None => AccountConfig {
                    account_name: previous.id.clone(),
                    ..AccountConfig::default()
                },
            };

            match provider.read_account(&previous.id, &declared).await? {
                ReadOutcome::Found(fresh) => {
                    util::write_state(&state.state, &fresh)?;
                    print_state(&fresh, global)
                }
                ReadOutcome::Gone(diag) => {
                    output::print_diagnostic(&diag, &global.color);
                    util::remove_state(&state.state)
                }
            }
        }

        AccountCommand::Show { id } => {
            let account = provider.read_account_data(&id).await?;
            let out = output::render_single(
                &global.output,
                &account,
                output::account_detail,
                |a| a.account_name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccountCommand::Delete { id, state } => {
            if !util::confirm(&format!("Delete account '{id}' and its whitelist?"), global.yes)? {
                return Ok(());
            }
            provider.delete_account(&id).await?;
            if let Some(path) = state {
                util::remove_state(&path)?;
            }
            info!(account = %id, "account deleted");
            if !global.quiet {
                eprintln!("Deleted account {id}");
            }
            Ok(())
        }
    }
}
