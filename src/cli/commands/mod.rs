use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::{
        ValueParser,
        styling::{AnsiColor, Effects, Styles},
    },
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

fn validator_role() -> ValueParser {
    ValueParser::from(|role: &str| -> std::result::Result<String, String> {
        match role {
            "student" | "teacher" => Ok(role.to_string()),
            other => Err(format!("invalid role: {other} (expected student or teacher)")),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("atesta")
        .about("Academic plagiarism checker client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Identity provider base URL")
                .env("ATESTA_PROVIDER_URL")
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Analysis/minting API base URL")
                .env("ATESTA_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Path of the persisted session file")
                .env("ATESTA_SESSION_FILE")
                .global(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Deadline in seconds for identity provider calls")
                .env("ATESTA_TIMEOUT_SECS")
                .value_parser(clap::value_parser!(u64))
                .global(true),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Demo mode: absorb provider failures into locally synthesized sessions")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ATESTA_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Authenticate and persist a session")
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password")
                        .env("ATESTA_PASSWORD")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("register")
                .about("Create an account and persist the resulting session")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Full name")
                        .required(true),
                )
                .arg(
                    Arg::new("email")
                        .short('e')
                        .long("email")
                        .help("Account email")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Account password (minimum 6 characters)")
                        .env("ATESTA_PASSWORD")
                        .required(true),
                )
                .arg(
                    Arg::new("confirm-password")
                        .long("confirm-password")
                        .help("Password confirmation; defaults to the password value")
                        .env("ATESTA_CONFIRM_PASSWORD"),
                )
                .arg(
                    Arg::new("role")
                        .short('r')
                        .long("role")
                        .help("Account role: student or teacher")
                        .default_value("student")
                        .value_parser(validator_role()),
                )
                .arg(
                    Arg::new("verification-doc")
                        .long("verification-doc")
                        .help("Verification document path, required for teacher registration")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the persisted session"))
        .subcommand(Command::new("status").about("Show session state and navigation affordances"))
        .subcommand(
            Command::new("setup")
                .about("One-off blockchain setup: provision an Aptos account and deploy the contract")
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .help("Aptos CLI profile name")
                        .default_value("plagiarism-checker"),
                )
                .arg(
                    Arg::new("network")
                        .long("network")
                        .help("Aptos network to provision against")
                        .default_value("testnet"),
                )
                .arg(
                    Arg::new("contract-dir")
                        .long("contract-dir")
                        .help("Move package directory to compile and publish")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "atesta");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Academic plagiarism checker client"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_login_args() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "atesta",
            "--provider-url",
            "https://id.example.edu",
            "login",
            "--email",
            "ada@example.edu",
            "--password",
            "s3cret-pass",
        ]);

        assert_eq!(
            matches
                .get_one::<String>("provider-url")
                .map(|s| s.to_string()),
            Some("https://id.example.edu".to_string())
        );
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "login");
        assert_eq!(
            sub.get_one::<String>("email").map(|s| s.to_string()),
            Some("ada@example.edu".to_string())
        );
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let command = new();
        let result = command.try_get_matches_from(vec![
            "atesta",
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.edu",
            "--password",
            "s3cret-pass",
            "--role",
            "dean",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ATESTA_PROVIDER_URL", Some("https://id.example.edu")),
                ("ATESTA_API_URL", Some("https://api.example.edu")),
                ("ATESTA_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["atesta", "status"]);
                assert_eq!(
                    matches
                        .get_one::<String>("provider-url")
                        .map(|s| s.to_string()),
                    Some("https://id.example.edu".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some("https://api.example.edu".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("ATESTA_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["atesta", "status"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_setup_defaults() {
        let command = new();
        let matches = command.get_matches_from(vec!["atesta", "setup"]);
        let (name, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(name, "setup");
        assert_eq!(
            sub.get_one::<String>("profile").map(|s| s.to_string()),
            Some("plagiarism-checker".to_string())
        );
        assert_eq!(
            sub.get_one::<String>("network").map(|s| s.to_string()),
            Some("testnet".to_string())
        );
    }
}
