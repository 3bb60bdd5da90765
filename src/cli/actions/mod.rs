pub mod account;
pub mod setup;

use crate::session::Role;
use secrecy::SecretString;
use std::path::PathBuf;

/// What the CLI was asked to do.
#[derive(Debug)]
pub enum Action {
    Login {
        email: String,
        password: SecretString,
    },
    Register {
        full_name: String,
        email: String,
        password: SecretString,
        confirm_password: SecretString,
        role: Role,
        verification_doc: Option<PathBuf>,
    },
    Logout,
    Status,
    Setup {
        profile: String,
        network: String,
        contract_dir: Option<PathBuf>,
    },
}
