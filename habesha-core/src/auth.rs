//! Mock Authentication
//!
//! Roles, the page route table with its role gates, and the login payload.
//! There is no real credential or token verification: the UI keeps the
//! logged-in user in local storage and gates pages with [`check_access`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::feedback::ParseError;

/// Local-storage key holding the logged-in user as JSON
pub const USER_STORAGE_KEY: &str = "habeshaUser";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guest" => Ok(Role::Guest),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// The logged-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: Role,
}

/// Read the user stored under [`USER_STORAGE_KEY`]. `None` means the stored
/// value is unusable and should be removed.
pub fn restore_user(stored: &str) -> Option<User> {
    serde_json::from_str(stored).ok()
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            Err("Username and password are required.")
        } else {
            Ok(())
        }
    }
}

// ============================================
// ROUTES
// ============================================

/// Pages of the web app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Contextual,
    GuestFeedback,
    StaffLog,
    AdminDashboard,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/login" => Route::Login,
            "/f" => Route::Contextual,
            "/feedback" => Route::GuestFeedback,
            "/staff/log" => Route::StaffLog,
            "/admin/dashboard" => Route::AdminDashboard,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Contextual => "/f",
            Route::GuestFeedback => "/feedback",
            Route::StaffLog => "/staff/log",
            Route::AdminDashboard => "/admin/dashboard",
            Route::NotFound => "/404",
        }
    }

    /// Roles allowed on this page; `None` for public pages
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::GuestFeedback => Some(&[Role::Guest, Role::Staff, Role::Admin]),
            Route::StaffLog => Some(&[Role::Staff, Role::Admin]),
            Route::AdminDashboard => Some(&[Role::Admin]),
            Route::Home | Route::Login | Route::Contextual | Route::NotFound => None,
        }
    }
}

/// Decision of the route gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Not logged in; remember where the user was going
    RedirectToLogin { from: String },
    /// Logged in with a role that may not see the page
    RedirectHome,
}

/// Gate a page for the current user
pub fn check_access(route: Route, user: Option<&User>) -> Access {
    let Some(allowed) = route.allowed_roles() else {
        return Access::Granted;
    };

    match user {
        None => Access::RedirectToLogin {
            from: route.path().to_string(),
        },
        Some(user) if allowed.contains(&user.role) => Access::Granted,
        Some(_) => Access::RedirectHome,
    }
}

/// Where to go after a successful login
pub fn landing_after_login(role: Role, from: Option<&str>) -> String {
    match role {
        Role::Admin => Route::AdminDashboard.path().to_string(),
        Role::Staff => Route::StaffLog.path().to_string(),
        Role::Guest => from
            .filter(|f| is_in_app_target(f))
            .unwrap_or(Route::GuestFeedback.path())
            .to_string(),
    }
}

/// A same-origin path naming a known page other than the login page
fn is_in_app_target(target: &str) -> bool {
    // "//host" and "/\host" are protocol-relative in browsers
    let same_origin = target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\');

    same_origin && !matches!(Route::from_path(target), Route::NotFound | Route::Login)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            name: "Test".to_string(),
            role,
        }
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/f?loc=pool"), Route::Contextual);
        assert_eq!(Route::from_path("/staff/log/"), Route::StaffLog);
        assert_eq!(Route::from_path("/staff"), Route::NotFound);
    }

    #[test]
    fn test_public_routes() {
        for route in [Route::Home, Route::Login, Route::Contextual, Route::NotFound] {
            assert_eq!(check_access(route, None), Access::Granted);
        }
    }

    #[test]
    fn test_gate_redirects_to_login() {
        assert_eq!(
            check_access(Route::StaffLog, None),
            Access::RedirectToLogin {
                from: "/staff/log".to_string()
            }
        );
    }

    #[test]
    fn test_gate_by_role() {
        let guest = user(Role::Guest);
        let staff = user(Role::Staff);
        let admin = user(Role::Admin);

        assert_eq!(check_access(Route::GuestFeedback, Some(&guest)), Access::Granted);
        assert_eq!(check_access(Route::StaffLog, Some(&guest)), Access::RedirectHome);
        assert_eq!(check_access(Route::StaffLog, Some(&staff)), Access::Granted);
        assert_eq!(check_access(Route::AdminDashboard, Some(&staff)), Access::RedirectHome);
        assert_eq!(check_access(Route::AdminDashboard, Some(&admin)), Access::Granted);
        assert_eq!(check_access(Route::StaffLog, Some(&admin)), Access::Granted);
    }

    #[test]
    fn test_landing_after_login() {
        assert_eq!(landing_after_login(Role::Admin, Some("/feedback")), "/admin/dashboard");
        assert_eq!(landing_after_login(Role::Staff, None), "/staff/log");
        assert_eq!(landing_after_login(Role::Guest, Some("/feedback")), "/feedback");
        assert_eq!(landing_after_login(Role::Guest, None), "/feedback");
        assert_eq!(landing_after_login(Role::Guest, Some("/login")), "/feedback");
    }

    #[test]
    fn test_landing_rejects_external_targets() {
        for from in [
            "https://evil.example/phish",
            "//evil.example/feedback",
            "/\\evil.example",
            "javascript:alert(1)",
            "feedback",
            "/no/such/page",
            "",
        ] {
            assert_eq!(landing_after_login(Role::Guest, Some(from)), "/feedback", "{from}");
        }
        assert_eq!(landing_after_login(Role::Guest, Some("/f?token=abc")), "/f?token=abc");
    }

    #[test]
    fn test_restore_user() {
        let stored = r#"{"name":"Admin User","role":"admin"}"#;
        assert_eq!(restore_user(stored), Some(User {
            name: "Admin User".to_string(),
            role: Role::Admin,
        }));
        assert_eq!(restore_user("{not json"), None);
        assert_eq!(restore_user(r#"{"name":"x","role":"owner"}"#), None);
    }

    #[test]
    fn test_login_request_validate() {
        let req = LoginRequest {
            username: " ".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(req.validate(), Err("Username and password are required."));
    }
}
