use crate::{cli::actions::Action, config::AppConfig, session::Role};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// Map parsed arguments to an [`Action`] plus the effective [`AppConfig`].
///
/// Configuration starts from defaults plus `ATESTA_*` environment overrides
/// and is then refined by global flags, so a flag always wins over the
/// environment.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, AppConfig)> {
    let mut config = AppConfig::load();
    if let Some(url) = matches.get_one::<String>("provider-url") {
        config.provider_base_url = url.to_string();
    }
    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api_base_url = url.to_string();
    }
    if let Some(path) = matches.get_one::<String>("session-file") {
        config.session_path = PathBuf::from(path);
    }
    if let Some(secs) = matches.get_one::<u64>("timeout") {
        config.call_timeout = Duration::from_secs(*secs);
    }
    if matches.get_flag("demo") {
        config.demo_mode = true;
    }

    let (name, sub) = matches.subcommand().context("a subcommand is required")?;

    let action = match name {
        "login" => Action::Login {
            email: required_string(sub, "email")?,
            password: SecretString::from(required_string(sub, "password")?),
        },
        "register" => {
            let password = required_string(sub, "password")?;
            let confirm_password = sub
                .get_one::<String>("confirm-password")
                .cloned()
                .unwrap_or_else(|| password.clone());
            Action::Register {
                full_name: required_string(sub, "name")?,
                email: required_string(sub, "email")?,
                password: SecretString::from(password),
                confirm_password: SecretString::from(confirm_password),
                role: required_string(sub, "role")?
                    .parse::<Role>()
                    .map_err(|err| anyhow::anyhow!(err))?,
                verification_doc: sub.get_one::<PathBuf>("verification-doc").cloned(),
            }
        }
        "logout" => Action::Logout,
        "status" => Action::Status,
        "setup" => Action::Setup {
            profile: required_string(sub, "profile")?,
            network: required_string(sub, "network")?,
            contract_dir: sub.get_one::<PathBuf>("contract-dir").cloned(),
        },
        other => anyhow::bail!("unknown subcommand: {other}"),
    };

    Ok((action, config))
}

fn required_string(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .map(String::to_string)
        .with_context(|| format!("missing required argument: --{name}"))
}

#[cfg(test)]
mod tests {
    use super::handler;
    use crate::cli::{actions::Action, commands};

    #[test]
    fn login_maps_to_action_and_overrides_config() {
        temp_env::with_vars([("ATESTA_SESSION_FILE", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "atesta",
                "--session-file",
                "/tmp/s.json",
                "--timeout",
                "3",
                "--demo",
                "login",
                "--email",
                "ada@example.edu",
                "--password",
                "s3cret-pass",
            ]);
            let (action, config) = handler(&matches).expect("handler");
            assert!(matches!(action, Action::Login { .. }));
            assert_eq!(config.session_path.to_str(), Some("/tmp/s.json"));
            assert_eq!(config.call_timeout.as_secs(), 3);
            assert!(config.demo_mode);
        });
    }

    #[test]
    fn register_defaults_confirm_password() {
        temp_env::with_vars([("ATESTA_CONFIRM_PASSWORD", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "atesta",
                "register",
                "--name",
                "Ada Lovelace",
                "--email",
                "ada@example.edu",
                "--password",
                "s3cret-pass",
            ]);
            let (action, _) = handler(&matches).expect("handler");
            match action {
                Action::Register {
                    password,
                    confirm_password,
                    ..
                } => {
                    use secrecy::ExposeSecret;
                    assert_eq!(password.expose_secret(), confirm_password.expose_secret());
                }
                other => panic!("expected register, got {other:?}"),
            }
        });
    }

    #[test]
    fn setup_carries_profile_and_network() {
        temp_env::with_vars([("ATESTA_PROVIDER_URL", None::<&str>)], || {
            let matches = commands::new().get_matches_from(vec![
                "atesta", "setup", "--profile", "ci", "--network", "devnet",
            ]);
            let (action, _) = handler(&matches).expect("handler");
            match action {
                Action::Setup {
                    profile,
                    network,
                    contract_dir,
                } => {
                    assert_eq!(profile, "ci");
                    assert_eq!(network, "devnet");
                    assert!(contract_dir.is_none());
                }
                other => panic!("expected setup, got {other:?}"),
            }
        });
    }
}
