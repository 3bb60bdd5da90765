//! Session and role types shared by the auth service, route guard, and
//! navigation observers.
//!
//! A session is either fully present (all fields set together) or fully
//! absent; partial persisted records are treated as absent by the store.
//! Role checks use an asymmetric containment rule: a teacher-gated check
//! accepts pending and verified teachers, every other required role is
//! strict equality. Teacher accounts stay teacher-scoped while awaiting
//! verification.

mod store;

pub use store::{FileStore, MemoryStore, SessionStore};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix on tokens issued from a real identity-provider round trip.
pub(crate) const PROVIDER_TOKEN_PREFIX: &str = "idp_";
/// Prefix on tokens synthesized locally in demo mode.
pub(crate) const DEMO_TOKEN_PREFIX: &str = "demo_";

/// Closed set of account roles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    /// Teacher account awaiting verification of the submitted document.
    PendingTeacher,
    /// Teacher account whose verification document has been approved.
    VerifiedTeacher,
}

impl Role {
    /// Whether this role satisfies a check gated on `required`.
    ///
    /// `Teacher`-gated checks accept `Teacher`, `PendingTeacher`, and
    /// `VerifiedTeacher`; all other required roles are exact matches.
    #[must_use]
    pub fn satisfies(self, required: Role) -> bool {
        match required {
            Role::Teacher => matches!(
                self,
                Role::Teacher | Role::PendingTeacher | Role::VerifiedTeacher
            ),
            other => self == other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::PendingTeacher => "pending_teacher",
            Role::VerifiedTeacher => "verified_teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "pending_teacher" => Ok(Role::PendingTeacher),
            "verified_teacher" => Ok(Role::VerifiedTeacher),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Where a session token came from, derived from its prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionOrigin {
    /// Issued after a successful identity-provider round trip.
    Provider,
    /// Synthesized locally while running in demo mode.
    Demo,
    /// Token without a recognized prefix, e.g. persisted by an older build.
    Unknown,
}

impl SessionOrigin {
    /// Classify a session token by its prefix.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.starts_with(PROVIDER_TOKEN_PREFIX) {
            Self::Provider
        } else if token.starts_with(DEMO_TOKEN_PREFIX) {
            Self::Demo
        } else {
            Self::Unknown
        }
    }
}

/// Authenticated identity and role context for the current user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub user_id: String,
}

impl Session {
    #[must_use]
    pub fn origin(&self) -> SessionOrigin {
        SessionOrigin::from_token(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEMO_TOKEN_PREFIX, PROVIDER_TOKEN_PREFIX, Role, Session, SessionOrigin};

    #[test]
    fn role_containment_accepts_teacher_variants() {
        assert!(Role::Teacher.satisfies(Role::Teacher));
        assert!(Role::PendingTeacher.satisfies(Role::Teacher));
        assert!(Role::VerifiedTeacher.satisfies(Role::Teacher));
        assert!(!Role::Student.satisfies(Role::Teacher));
    }

    #[test]
    fn role_containment_is_strict_for_other_roles() {
        assert!(Role::Student.satisfies(Role::Student));
        assert!(!Role::Teacher.satisfies(Role::Student));
        assert!(Role::PendingTeacher.satisfies(Role::PendingTeacher));
        assert!(!Role::VerifiedTeacher.satisfies(Role::PendingTeacher));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [
            Role::Student,
            Role::Teacher,
            Role::PendingTeacher,
            Role::VerifiedTeacher,
        ] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn session_origin_from_token_classifies_prefixes() {
        assert_eq!(
            SessionOrigin::from_token(&format!("{PROVIDER_TOKEN_PREFIX}abc")),
            SessionOrigin::Provider
        );
        assert_eq!(
            SessionOrigin::from_token(&format!("{DEMO_TOKEN_PREFIX}abc")),
            SessionOrigin::Demo
        );
        assert_eq!(SessionOrigin::from_token("plain"), SessionOrigin::Unknown);
    }

    #[test]
    fn session_serializes_roles_snake_case() {
        let session = Session {
            token: "idp_abc".to_string(),
            role: Role::PendingTeacher,
            email: "ada@example.edu".to_string(),
            name: "Ada".to_string(),
            user_id: "u-1".to_string(),
        };
        let value = serde_json::to_value(&session).expect("serialize session");
        assert_eq!(value["role"], "pending_teacher");
    }
}
