//! Session-change notification and the navigation affordance model.
//!
//! The auth core has no dependency on any rendering technology: interested
//! consumers register a [`SessionObserver`] and receive the new session
//! state after every save or clear. [`NavAffordances`] is the pure-data
//! rendering of the navigation bar for a given session, so UI code reduces
//! to displaying it.

use crate::session::{Role, Session};

/// Callback interface invoked after every session mutation.
pub trait SessionObserver: Send + Sync {
    fn session_changed(&self, session: Option<&Session>);
}

/// Navigation destinations the client knows about.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NavLink {
    Login,
    SignUp,
    Dashboard,
    UploadDocument,
    TeacherDashboard,
    Logout,
}

/// What the navigation bar should offer for a given session state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavAffordances {
    /// Display name of the signed-in user, absent when unauthenticated.
    pub greeting: Option<String>,
    pub links: Vec<NavLink>,
}

impl NavAffordances {
    /// Pure function of session state to navigation affordances.
    #[must_use]
    pub fn for_session(session: Option<&Session>) -> Self {
        match session {
            None => Self {
                greeting: None,
                links: vec![NavLink::Login, NavLink::SignUp],
            },
            Some(session) => {
                let mut links = vec![NavLink::Dashboard, NavLink::UploadDocument];
                if session.role.satisfies(Role::Teacher) {
                    links.push(NavLink::TeacherDashboard);
                }
                links.push(NavLink::Logout);
                Self {
                    greeting: Some(session.name.clone()),
                    links,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NavAffordances, NavLink};
    use crate::session::{Role, Session};

    fn session_with_role(role: Role) -> Session {
        Session {
            token: "idp_t".to_string(),
            role,
            email: "u@example.edu".to_string(),
            name: "U".to_string(),
            user_id: "uid".to_string(),
        }
    }

    #[test]
    fn unauthenticated_gets_login_and_signup() {
        let nav = NavAffordances::for_session(None);
        assert_eq!(nav.greeting, None);
        assert_eq!(nav.links, vec![NavLink::Login, NavLink::SignUp]);
    }

    #[test]
    fn student_gets_no_teacher_dashboard() {
        let nav = NavAffordances::for_session(Some(&session_with_role(Role::Student)));
        assert!(nav.links.contains(&NavLink::Dashboard));
        assert!(!nav.links.contains(&NavLink::TeacherDashboard));
        assert!(nav.links.contains(&NavLink::Logout));
    }

    #[test]
    fn pending_teacher_gets_teacher_dashboard() {
        let nav = NavAffordances::for_session(Some(&session_with_role(Role::PendingTeacher)));
        assert_eq!(nav.greeting.as_deref(), Some("U"));
        assert!(nav.links.contains(&NavLink::TeacherDashboard));
    }
}
