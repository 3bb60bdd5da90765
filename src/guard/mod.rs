//! Page-entry access checks.
//!
//! Guards are evaluated once when a page is entered; there is no reactive
//! re-check while a page stays active. A failed check resolves by issuing a
//! navigation to the redirect target and returning `false`, never by
//! returning an error. The [`Navigator`] trait keeps the core free of any
//! particular navigation technology.

use crate::{auth::AuthService, session::Role};
use tracing::debug;

/// Navigation side-effect sink, e.g. a router push or a URL change.
pub trait Navigator {
    fn navigate(&self, target: &str);
}

/// Gate for authenticated and role-scoped pages.
pub struct RouteGuard<N: Navigator> {
    navigator: N,
}

impl<N: Navigator> RouteGuard<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    /// True when authenticated; otherwise navigates to `redirect` and
    /// returns false.
    pub fn require_auth(&self, auth: &AuthService, redirect: &str) -> bool {
        if auth.is_authenticated() {
            return true;
        }
        debug!(redirect, "unauthenticated access, redirecting");
        self.navigator.navigate(redirect);
        false
    }

    /// True when the session satisfies `role` (teacher containment rule
    /// included); otherwise navigates to `redirect` and returns false.
    pub fn require_role(&self, auth: &AuthService, role: Role, redirect: &str) -> bool {
        if auth.has_role(role) {
            return true;
        }
        debug!(redirect, %role, "missing role, redirecting");
        self.navigator.navigate(redirect);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{Navigator, RouteGuard};
    use crate::{
        auth::{AuthConfig, AuthService, IdentityProvider, UserRecord},
        session::{MemoryStore, Role, Session, SessionStore},
    };
    use crate::Error;
    use async_trait::async_trait;
    use secrecy::SecretString;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNavigator {
        targets: Mutex<Vec<String>>,
    }

    impl Navigator for &RecordingNavigator {
        fn navigate(&self, target: &str) {
            self.targets
                .lock()
                .expect("navigator lock")
                .push(target.to_string());
        }
    }

    struct UnusedProvider;

    #[async_trait]
    impl IdentityProvider for UnusedProvider {
        async fn create_user(&self, _: &str, _: &SecretString) -> Result<String, Error> {
            unreachable!("guard tests never call the provider")
        }
        async fn sign_in(&self, _: &str, _: &SecretString) -> Result<String, Error> {
            unreachable!("guard tests never call the provider")
        }
        async fn get_user_record(&self, _: &str) -> Result<Option<UserRecord>, Error> {
            unreachable!("guard tests never call the provider")
        }
        async fn set_user_record(&self, _: &str, _: &UserRecord) -> Result<(), Error> {
            unreachable!("guard tests never call the provider")
        }
        async fn upload_file(&self, _: &str, _: &[u8]) -> Result<String, Error> {
            unreachable!("guard tests never call the provider")
        }
    }

    fn auth_with_role(role: Option<Role>) -> AuthService {
        let store = MemoryStore::new();
        if let Some(role) = role {
            store
                .save(&Session {
                    token: "idp_t".to_string(),
                    role,
                    email: "u@example.edu".to_string(),
                    name: "U".to_string(),
                    user_id: "uid".to_string(),
                })
                .expect("seed session");
        }
        AuthService::new(Box::new(store), Arc::new(UnusedProvider), AuthConfig::default())
            .expect("service")
    }

    #[test]
    fn require_auth_passes_when_authenticated() {
        let navigator = RecordingNavigator::default();
        let guard = RouteGuard::new(&navigator);
        let auth = auth_with_role(Some(Role::Student));

        assert!(guard.require_auth(&auth, "login.html"));
        assert!(navigator.targets.lock().expect("lock").is_empty());
    }

    #[test]
    fn require_auth_redirects_when_unauthenticated() {
        let navigator = RecordingNavigator::default();
        let guard = RouteGuard::new(&navigator);
        let auth = auth_with_role(None);

        assert!(!guard.require_auth(&auth, "login.html"));
        assert_eq!(
            navigator.targets.lock().expect("lock").as_slice(),
            ["login.html"]
        );
    }

    #[test]
    fn require_role_applies_containment_rule() {
        let navigator = RecordingNavigator::default();
        let guard = RouteGuard::new(&navigator);
        let auth = auth_with_role(Some(Role::PendingTeacher));

        assert!(guard.require_role(&auth, Role::Teacher, "index.html"));
        assert!(navigator.targets.lock().expect("lock").is_empty());
    }

    #[test]
    fn require_role_redirects_wrong_role() {
        let navigator = RecordingNavigator::default();
        let guard = RouteGuard::new(&navigator);
        let auth = auth_with_role(Some(Role::Student));

        assert!(!guard.require_role(&auth, Role::Teacher, "index.html"));
        assert_eq!(
            navigator.targets.lock().expect("lock").as_slice(),
            ["index.html"]
        );
    }
}
