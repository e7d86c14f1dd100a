//! Single whitelist entry handlers.

use portnox_core::{AddressConfig, AddressState, Provider};

use crate::cli::{AddressArgs, AddressCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

fn print_state(state: &AddressState, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(
        &global.output,
        state,
        |s| output::entry_table(std::slice::from_ref(&s.entry)),
        |s| s.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    provider: &Provider,
    args: AddressArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AddressCommand::Add { declared, state } => {
            let config: AddressConfig = util::read_declared(&declared.file)?;
            let added = provider.create_address(&config).await?;
            util::write_state(&state.state, &added)?;
            print_state(&added, global)
        }

        AddressCommand::Show { state } => {
            let tracked: AddressState = util::read_state(&state.state)?;
            let fresh = provider.read_address(&tracked).await?;
            print_state(&fresh, global)
        }

        AddressCommand::Remove { state } => {
            let tracked: AddressState = util::read_state(&state.state)?;
            if !util::confirm(&format!("Remove {}?", tracked.id), global.yes)? {
                return Ok(());
            }
            provider.delete_address(&tracked).await?;
            util::remove_state(&state.state)
        }
    }
}
