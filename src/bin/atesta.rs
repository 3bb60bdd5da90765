use anyhow::Result;
use atesta::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, config) = start()?;

    // Handle the action
    match action {
        Action::Setup {
            ref profile,
            ref network,
            ref contract_dir,
        } => actions::setup::handle(profile, network, contract_dir.as_deref())?,
        other => actions::account::handle(other, &config).await?,
    }

    Ok(())
}
