//! The auth service owns every session state transition.
//!
//! Flow Overview: `login` and `register` validate local input, call the
//! identity provider under a deadline, then persist and announce the new
//! session. `logout` clears unconditionally and never fails. Accessors are
//! pure reads of the in-memory session, which is hydrated from the store at
//! construction.
//!
//! Demo mode is the only path that absorbs a provider failure, it is opt-in,
//! and every substitution is logged at WARN with the reason. Validation
//! errors are never absorbed: bad input fails before any provider call or
//! store write, leaving a prior session untouched.

use crate::{
    Error,
    auth::{
        observer::SessionObserver,
        provider::{IdentityProvider, UserRecord},
    },
    session::{DEMO_TOKEN_PREFIX, PROVIDER_TOKEN_PREFIX, Role, Session, SessionStore},
};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::{
    future::Future,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 6;
/// Default deadline applied to every identity-provider call.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Service policy knobs.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Absorb provider failures into locally synthesized sessions.
    /// Off by default; never enable outside demos.
    pub demo_mode: bool,
    /// Deadline for each provider call; expiry surfaces as `Error::Timeout`.
    pub call_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            demo_mode: false,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Teacher verification document attached to a registration.
#[derive(Clone, Debug)]
pub struct VerificationDoc {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Registration input. Roles other than `Student`/`Teacher` are rejected;
/// the pending/verified states are owned by the verification workflow.
#[derive(Clone, Debug)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub role: Role,
    pub verification_doc: Option<VerificationDoc>,
}

/// Sole owner of authentication state transitions. Explicitly constructed
/// and wired by the host application; there are no globals.
pub struct AuthService {
    store: Box<dyn SessionStore>,
    provider: Arc<dyn IdentityProvider>,
    config: AuthConfig,
    session: Option<Session>,
    observers: Vec<Arc<dyn SessionObserver>>,
}

impl AuthService {
    /// Build the service and hydrate the in-memory session from the store.
    ///
    /// # Errors
    /// Returns `Error::Store` when the store cannot be read.
    pub fn new(
        store: Box<dyn SessionStore>,
        provider: Arc<dyn IdentityProvider>,
        config: AuthConfig,
    ) -> Result<Self, Error> {
        let session = store.load()?;
        if let Some(session) = &session {
            debug!(email = %session.email, role = %session.role, "session hydrated from store");
        }
        Ok(Self {
            store,
            provider,
            config,
            session,
            observers: Vec::new(),
        })
    }

    /// Register an observer and immediately deliver the current state so it
    /// can render without waiting for the next mutation.
    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) {
        observer.session_changed(self.session.as_ref());
        self.observers.push(observer);
    }

    /// Authenticate with the identity provider and install the session.
    ///
    /// # Errors
    /// `Error::Validation` when either field is empty; `Error::Provider` or
    /// `Error::Timeout` when the provider fails and demo mode is off;
    /// `Error::Store` when persisting the new session fails.
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<Session, Error> {
        if email.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(Error::Validation(
                "email and password are required".to_string(),
            ));
        }

        let attempt = self.provider_login(email, password).await;
        let session = match attempt {
            Ok(session) => session,
            Err(err) if err.is_remote() && self.config.demo_mode => {
                warn!(%err, email, "identity provider unavailable, issuing demo session");
                demo_session(email, None, Role::Student)?
            }
            Err(err) => return Err(err),
        };

        self.install(session.clone())?;
        info!(email = %session.email, role = %session.role, "login succeeded");
        Ok(session)
    }

    /// Create an account and install the resulting session. A `Teacher`
    /// registration yields role `PendingTeacher` until the out-of-band
    /// verification step promotes it.
    ///
    /// # Errors
    /// `Error::Validation` for any field violation, surfaced before any
    /// provider call or store write; provider/store errors as in [`login`].
    ///
    /// [`login`]: AuthService::login
    pub async fn register(&mut self, request: RegisterRequest) -> Result<Session, Error> {
        validate_registration(&request)?;

        let attempt = self.provider_register(&request).await;
        let session = match attempt {
            Ok(session) => session,
            Err(err) if err.is_remote() && self.config.demo_mode => {
                warn!(%err, email = %request.email, "identity provider unavailable, issuing demo session");
                demo_session(
                    &request.email,
                    Some(&request.full_name),
                    registered_role(request.role),
                )?
            }
            Err(err) => return Err(err),
        };

        self.install(session.clone())?;
        info!(email = %session.email, role = %session.role, "registration succeeded");
        Ok(session)
    }

    /// Clear the store and the in-memory session unconditionally. Always
    /// succeeds; a second call is a no-op. Store failures are logged, not
    /// surfaced, so logout cannot strand a signed-in UI.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            warn!(%err, "failed to clear session store during logout");
        }
        if self.session.take().is_some() {
            info!("logged out");
        }
        self.notify();
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.token.is_empty())
    }

    /// Role check applying the teacher containment rule; false when
    /// unauthenticated.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.role.satisfies(required))
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.session.as_ref().map(|session| session.token.as_str())
    }

    async fn provider_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        let uid = self
            .deadline("sign_in", self.provider.sign_in(email, password))
            .await?;
        let record = self
            .deadline("get_user_record", self.provider.get_user_record(&uid))
            .await?
            .ok_or_else(|| Error::Provider(format!("no user record for uid {uid}")))?;
        Ok(Session {
            token: generate_token(PROVIDER_TOKEN_PREFIX)?,
            role: record.role,
            email: record.email,
            name: record.name,
            user_id: record.uid,
        })
    }

    async fn provider_register(&self, request: &RegisterRequest) -> Result<Session, Error> {
        let uid = self
            .deadline(
                "create_user",
                self.provider.create_user(&request.email, &request.password),
            )
            .await?;

        let verification_doc_url = match &request.verification_doc {
            Some(doc) => {
                let path = format!("verification_docs/{uid}/{}", doc.filename);
                let url = self
                    .deadline("upload_file", self.provider.upload_file(&path, &doc.bytes))
                    .await?;
                debug!(%url, "verification document uploaded");
                Some(url)
            }
            None => None,
        };

        let role = registered_role(request.role);
        let record = UserRecord {
            uid: uid.clone(),
            email: request.email.clone(),
            name: request.full_name.clone(),
            role,
            verification_doc_url,
            verification_status: (role == Role::PendingTeacher).then(|| "pending".to_string()),
            created_at: unix_timestamp(),
        };
        self.deadline(
            "set_user_record",
            self.provider.set_user_record(&uid, &record),
        )
        .await?;

        Ok(Session {
            token: generate_token(PROVIDER_TOKEN_PREFIX)?,
            role,
            email: record.email,
            name: record.name,
            user_id: uid,
        })
    }

    async fn deadline<T>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, Error> {
        match tokio::time::timeout(self.config.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "{:?} waiting for {what}",
                self.config.call_timeout
            ))),
        }
    }

    fn install(&mut self, session: Session) -> Result<(), Error> {
        self.store.save(&session)?;
        self.session = Some(session);
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        for observer in &self.observers {
            observer.session_changed(self.session.as_ref());
        }
    }
}

/// Role actually granted at registration time: teacher signups start out
/// pending until verified.
fn registered_role(requested: Role) -> Role {
    match requested {
        Role::Teacher => Role::PendingTeacher,
        other => other,
    }
}

fn validate_registration(request: &RegisterRequest) -> Result<(), Error> {
    if request.full_name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(Error::Validation("please fill in all fields".to_string()));
    }
    if !valid_email(request.email.trim()) {
        return Err(Error::Validation(format!(
            "invalid email address: {}",
            request.email
        )));
    }
    let password = request.password.expose_secret();
    if password.is_empty() || request.confirm_password.expose_secret().is_empty() {
        return Err(Error::Validation("please fill in all fields".to_string()));
    }
    if password != request.confirm_password.expose_secret() {
        return Err(Error::Validation("passwords do not match".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    match request.role {
        Role::Student => {}
        Role::Teacher => {
            if request.verification_doc.is_none() {
                return Err(Error::Validation(
                    "teacher registration requires a verification document".to_string(),
                ));
            }
        }
        Role::PendingTeacher | Role::VerifiedTeacher => {
            return Err(Error::Validation(
                "role must be student or teacher".to_string(),
            ));
        }
    }
    Ok(())
}

/// Basic email format check on trimmed input.
fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email))
}

/// Random URL-safe session token with an origin prefix.
fn generate_token(prefix: &str) -> Result<String, Error> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| Error::Provider(format!("failed to generate session token: {err}")))?;
    Ok(format!("{prefix}{}", Base64UrlUnpadded::encode_string(&bytes)))
}

/// Locally synthesized session for demo mode. The name falls back to the
/// email local part, matching what the provider-backed path would show.
fn demo_session(email: &str, name: Option<&str>, role: Role) -> Result<Session, Error> {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => email.split('@').next().unwrap_or(email).to_string(),
    };
    Ok(Session {
        token: generate_token(DEMO_TOKEN_PREFIX)?,
        role,
        email: email.to_string(),
        name,
        user_id: Uuid::new_v4().to_string(),
    })
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
        .to_string()
}
