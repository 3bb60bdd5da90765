//! Handlers for the session-facing subcommands.
//!
//! Each invocation wires a fresh [`AuthService`] from the configured session
//! file and identity provider; there are no long-lived globals. Output meant
//! for the user goes to stdout, diagnostics go through tracing.

use crate::{
    auth::{
        AuthConfig, AuthService, NavAffordances, RestProvider, SessionObserver,
        RegisterRequest, VerificationDoc,
    },
    cli::actions::Action,
    config::AppConfig,
    guard::{Navigator, RouteGuard},
    session::{FileStore, Role, Session, SessionOrigin},
};
use anyhow::{Context, Result, anyhow};
use std::{fs, sync::Arc};
use tracing::debug;

/// Logs the navigation affordances after every session change, standing in
/// for the UI layer a web host would attach.
struct NavLogger;

impl SessionObserver for NavLogger {
    fn session_changed(&self, session: Option<&Session>) {
        let nav = NavAffordances::for_session(session);
        debug!(?nav, "navigation affordances updated");
    }
}

/// Prints the redirect a web client would perform.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, target: &str) {
        println!("not signed in, a client would redirect to: {target}");
    }
}

fn build_service(config: &AppConfig) -> Result<AuthService> {
    let store = FileStore::new(config.session_path.clone());
    let provider =
        RestProvider::new(&config.provider_base_url).context("failed to build provider client")?;
    let auth_config = AuthConfig {
        demo_mode: config.demo_mode,
        call_timeout: config.call_timeout,
    };
    let mut service = AuthService::new(Box::new(store), Arc::new(provider), auth_config)
        .context("failed to load session store")?;
    service.subscribe(Arc::new(NavLogger));
    Ok(service)
}

/// Handle login, register, logout, and status.
pub async fn handle(action: Action, config: &AppConfig) -> Result<()> {
    match action {
        Action::Login { email, password } => {
            let mut auth = build_service(config)?;
            let session = auth.login(&email, &password).await?;
            print_session("signed in", &session);
            Ok(())
        }
        Action::Register {
            full_name,
            email,
            password,
            confirm_password,
            role,
            verification_doc,
        } => {
            let verification_doc = verification_doc
                .map(|path| -> Result<VerificationDoc> {
                    let bytes = fs::read(&path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    let filename = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .map(str::to_string)
                        .ok_or_else(|| anyhow!("invalid document path: {}", path.display()))?;
                    Ok(VerificationDoc { filename, bytes })
                })
                .transpose()?;

            let mut auth = build_service(config)?;
            let session = auth
                .register(RegisterRequest {
                    full_name,
                    email,
                    password,
                    confirm_password,
                    role,
                    verification_doc,
                })
                .await?;
            if session.role == Role::PendingTeacher {
                println!("registration successful, teacher account pending verification");
            } else {
                println!("registration successful");
            }
            print_session("signed in", &session);
            Ok(())
        }
        Action::Logout => {
            let mut auth = build_service(config)?;
            auth.logout();
            println!("signed out");
            Ok(())
        }
        Action::Status => {
            println!(
                "atesta {} ({})",
                env!("CARGO_PKG_VERSION"),
                crate::GIT_COMMIT_HASH
            );
            let auth = build_service(config)?;
            let guard = RouteGuard::new(PrintNavigator);
            if !guard.require_auth(&auth, "login") {
                return Ok(());
            }
            let session = auth
                .current_user()
                .ok_or_else(|| anyhow!("authenticated without a session"))?;
            print_session("signed in", session);
            if guard.require_role(&auth, Role::Teacher, "dashboard") {
                println!("teacher dashboard: accessible");
            }
            Ok(())
        }
        Action::Setup { .. } => unreachable!("setup is dispatched separately"),
    }
}

fn print_session(prefix: &str, session: &Session) {
    let origin = match session.origin() {
        SessionOrigin::Demo => " (demo session)",
        SessionOrigin::Provider | SessionOrigin::Unknown => "",
    };
    println!(
        "{prefix}: {} <{}> role={}{origin}",
        session.name, session.email, session.role
    );
}
