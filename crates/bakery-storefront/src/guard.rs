//! Route protection for admin pages.

use std::sync::Arc;

use bakery_client::Session;
use bakery_core::User;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
/// Where a successful sign-in lands when no location was preserved.
pub const DEFAULT_AFTER_LOGIN: &str = "/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Any signed-in user.
    SignedIn,
    /// Signed-in users with `is_admin`.
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Send the user to the login page, remembering where they were going.
    Login { return_to: String },
    /// Signed in but not allowed; send them to the storefront.
    Home,
}

/// Decides whether a route may render for the current session.
#[derive(Debug, Clone)]
pub struct AuthGate {
    session: Arc<Session>,
}

impl AuthGate {
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// `user` is the profile from `/api/auth/me` when it has been fetched.
    /// Without it an admin route is allowed on token presence alone and the
    /// backend has the final word.
    #[must_use]
    pub fn check(&self, location: &str, access: Access, user: Option<&User>) -> GateDecision {
        if access == Access::Public {
            return GateDecision::Allow;
        }
        if !self.session.is_authenticated() {
            tracing::debug!(%location, "unauthenticated access; redirecting to login");
            return GateDecision::Login {
                return_to: location.to_string(),
            };
        }
        match (access, user) {
            (Access::Admin, Some(user)) if !user.is_admin => {
                tracing::debug!(%location, email = %user.email, "non-admin on admin route");
                GateDecision::Home
            }
            _ => GateDecision::Allow,
        }
    }

    /// Where to go after a successful sign-in.
    ///
    /// Only same-site paths are honoured; anything else, including the login
    /// page itself, falls back to [`DEFAULT_AFTER_LOGIN`].
    #[must_use]
    pub fn after_login(return_to: Option<&str>) -> String {
        match return_to {
            Some(path)
                if path.starts_with('/')
                    && !path.starts_with("//")
                    && !path.starts_with(LOGIN_PATH) =>
            {
                path.to_string()
            }
            _ => DEFAULT_AFTER_LOGIN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
        serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "email": "someone@bakery.test",
            "is_admin": is_admin
        }))
        .unwrap()
    }

    fn gate(signed_in: bool) -> AuthGate {
        let session = Arc::new(Session::in_memory());
        if signed_in {
            session.set_token("t").unwrap();
        }
        AuthGate::new(session)
    }

    #[test]
    fn public_routes_always_render() {
        assert_eq!(gate(false).check("/", Access::Public, None), GateDecision::Allow);
    }

    #[test]
    fn signed_out_admin_route_preserves_location() {
        assert_eq!(
            gate(false).check("/admin/products", Access::Admin, None),
            GateDecision::Login {
                return_to: "/admin/products".to_string()
            }
        );
    }

    #[test]
    fn token_without_profile_is_allowed() {
        assert_eq!(
            gate(true).check("/admin", Access::Admin, None),
            GateDecision::Allow
        );
    }

    #[test]
    fn non_admin_is_sent_home() {
        let g = gate(true);
        assert_eq!(
            g.check("/admin", Access::Admin, Some(&user(false))),
            GateDecision::Home
        );
        assert_eq!(
            g.check("/account", Access::SignedIn, Some(&user(false))),
            GateDecision::Allow
        );
        assert_eq!(
            g.check("/admin", Access::Admin, Some(&user(true))),
            GateDecision::Allow
        );
    }

    #[test]
    fn after_login_defaults_to_admin() {
        assert_eq!(AuthGate::after_login(None), "/admin");
        assert_eq!(
            AuthGate::after_login(Some("/admin/categories")),
            "/admin/categories"
        );
        assert_eq!(AuthGate::after_login(Some("https://evil.test")), "/admin");
        assert_eq!(AuthGate::after_login(Some("//evil.test")), "/admin");
        assert_eq!(AuthGate::after_login(Some("/login")), "/admin");
    }

    #[test]
    fn logout_closes_the_gate() {
        let g = gate(true);
        assert_eq!(g.check("/admin", Access::Admin, None), GateDecision::Allow);
        g.session.clear();
        assert!(matches!(
            g.check("/admin", Access::Admin, None),
            GateDecision::Login { .. }
        ));
    }
}
