//! Whitelist collection handlers.
//!
//! `apply` creates the collection when no state file exists yet and
//! reconciles against it otherwise.

use portnox_core::{AddressesConfig, AddressesState, ImportId, Provider};

use crate::cli::{AddressesArgs, AddressesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn print_state(state: &AddressesState, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_entries(&global.output, &state.mac_addresses)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    provider: &Provider,
    args: AddressesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AddressesCommand::Apply { declared, state } => {
            let config: AddressesConfig = util::read_declared(&declared.file)?;
            let next = if state.state.exists() {
                let previous: AddressesState = util::read_state(&state.state)?;
                provider.update_addresses(&previous, &config).await?
            } else {
                provider.create_addresses(&config).await?
            };
            util::write_state(&state.state, &next)?;
            print_state(&next, global)
        }

        AddressesCommand::Refresh { state, file } => {
            let previous: AddressesState = util::read_state(&state.state)?;
            let declared = file
                .as_deref()
                .map(util::read_declared::<AddressesConfig>)
                .transpose()?;
            let fresh = provider
                .read_addresses(&previous, declared.as_ref())
                .await?;
            util::write_state(&state.state, &fresh)?;
            print_state(&fresh, global)
        }

        AddressesCommand::Destroy { state } => {
            let previous: AddressesState = util::read_state(&state.state)?;
            let prompt = format!(
                "Remove {} whitelist entries from account '{}'?",
                previous.mac_addresses.len(),
                previous.account_name
            );
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }
            provider.delete_addresses(&previous).await?;
            util::remove_state(&state.state)
        }

        AddressesCommand::Import { id, state } => {
            let id: ImportId = id.parse()?;
            let imported = provider.import_addresses(&id).await?;
            util::write_state(&state.state, &imported)?;
            print_state(&imported, global)
        }
    }
}
