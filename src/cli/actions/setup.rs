//! One-off blockchain setup helper.
//!
//! Sequential glue over the Aptos CLI: verify the CLI is installed,
//! provision a named profile on the requested network, report the account
//! address from the CLI config, and optionally compile and publish the Move
//! package holding the certificate contract. Nothing here is retried; a
//! failed step surfaces with context and the command can be re-run.

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use std::{
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, info};

/// Run the full setup sequence.
pub fn handle(profile: &str, network: &str, contract_dir: Option<&Path>) -> Result<()> {
    let version = aptos_cli_version()?;
    println!("aptos CLI found: {version}");

    init_profile(profile, network)?;
    println!("profile '{profile}' initialized on {network}");

    let address = account_address(&aptos_config_path()?, profile)?;
    println!("account address: 0x{address}");
    println!("fund it via the {network} faucet before publishing");

    if let Some(dir) = contract_dir {
        publish_package(profile, dir, &address)?;
        println!("contract published from {}", dir.display());
    }

    Ok(())
}

fn aptos_cli_version() -> Result<String> {
    let output = Command::new("aptos")
        .arg("--version")
        .output()
        .context("aptos CLI not found, install it from https://aptos.dev/tools/aptos-cli/")?;
    if !output.status.success() {
        bail!("aptos --version exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn init_profile(profile: &str, network: &str) -> Result<()> {
    debug!(profile, network, "running aptos init");
    let status = Command::new("aptos")
        .args(["init", "--profile", profile, "--network", network])
        .status()
        .context("failed to run aptos init")?;
    if !status.success() {
        bail!("aptos init exited with {status}");
    }
    Ok(())
}

fn aptos_config_path() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| anyhow!("HOME is not set"))?;
    Ok(PathBuf::from(home).join(".aptos").join("config.yaml"))
}

/// Extract the profile's account address from the Aptos CLI config.
fn account_address(config_path: &Path, profile: &str) -> Result<String> {
    let config = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    extract_address(&config, profile)
        .ok_or_else(|| anyhow!("no account address for profile {profile} in aptos config"))
}

fn extract_address(config: &str, profile: &str) -> Option<String> {
    // The CLI config is YAML: profiles.<name>.account holds a hex address.
    let profile_pattern = format!(r"(?s){}:\s.*?account:\s*([0-9a-fA-F]+)", regex::escape(profile));
    let regex = Regex::new(&profile_pattern).ok()?;
    regex
        .captures(config)
        .map(|captures| captures[1].to_string())
}

fn publish_package(profile: &str, dir: &Path, address: &str) -> Result<()> {
    info!(package = %dir.display(), "compiling move package");
    let named_address = format!("plagiarism_checker=0x{address}");
    let status = Command::new("aptos")
        .args(["move", "compile", "--named-addresses", &named_address])
        .arg("--package-dir")
        .arg(dir)
        .status()
        .context("failed to run aptos move compile")?;
    if !status.success() {
        bail!("aptos move compile exited with {status}");
    }

    info!(package = %dir.display(), "publishing move package");
    let status = Command::new("aptos")
        .args([
            "move",
            "publish",
            "--profile",
            profile,
            "--named-addresses",
            &named_address,
            "--assume-yes",
        ])
        .arg("--package-dir")
        .arg(dir)
        .status()
        .context("failed to run aptos move publish")?;
    if !status.success() {
        bail!("aptos move publish exited with {status}");
    }
    Ok(())
}
