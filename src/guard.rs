//! Route-guard decisions.
//!
//! Guards are pure functions of a session snapshot plus the configured
//! redirect targets; the routing layer renders, waits, or navigates based
//! on the returned decision. While bootstrap is pending every guard asks
//! the caller to wait, so a protected page never flash-redirects before
//! the persisted session has been resolved.

use crate::auth::SessionView;
use crate::config::RouteTargets;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the guarded content.
    Allow,
    /// Bootstrap still pending; render a neutral waiting state.
    Wait,
    /// Navigate to the given path instead of rendering.
    Redirect(String),
}

/// Which dashboard a signed-in user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Admin,
    Agent,
    Standard,
}

/// Guard for routes that require a signed-in user.
pub fn protected(view: &SessionView, targets: &RouteTargets) -> GuardDecision {
    if !view.is_ready() {
        return GuardDecision::Wait;
    }
    if !view.is_authenticated() {
        return GuardDecision::Redirect(targets.login.clone());
    }
    GuardDecision::Allow
}

/// Guard for admin-only routes. A signed-in non-admin is sent to the
/// landing dashboard, not to login: the session is valid, the privilege
/// is not.
pub fn admin_only(view: &SessionView, targets: &RouteTargets) -> GuardDecision {
    match protected(view, targets) {
        GuardDecision::Allow if !view.is_admin() => {
            GuardDecision::Redirect(targets.dashboard.clone())
        }
        other => other,
    }
}

/// Guard for routes that only make sense logged out (the login page).
pub fn public_only(view: &SessionView, targets: &RouteTargets) -> GuardDecision {
    if !view.is_ready() {
        return GuardDecision::Wait;
    }
    if view.is_authenticated() {
        return GuardDecision::Redirect(targets.dashboard.clone());
    }
    GuardDecision::Allow
}

/// Role-based dashboard selection for the generic landing route.
pub fn dashboard_for(view: &SessionView) -> DashboardView {
    if view.is_admin() {
        DashboardView::Admin
    } else if view.is_agent() {
        DashboardView::Agent
    } else {
        DashboardView::Standard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Loading;
    use crate::models::User;

    fn user_with_role(role: &str) -> User {
        serde_json::from_value(serde_json::json!({
            "email": "u@example.com",
            "role": role,
        }))
        .unwrap()
    }

    fn pending() -> SessionView {
        SessionView {
            loading: Loading::Pending,
            user: None,
        }
    }

    fn ready(user: Option<User>) -> SessionView {
        SessionView {
            loading: Loading::Ready,
            user,
        }
    }

    #[test]
    fn test_protected_waits_while_pending() {
        let targets = RouteTargets::default();
        assert_eq!(protected(&pending(), &targets), GuardDecision::Wait);
    }

    #[test]
    fn test_protected_redirects_anonymous_to_login() {
        let targets = RouteTargets::default();
        assert_eq!(
            protected(&ready(None), &targets),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_protected_allows_any_signed_in_user() {
        let targets = RouteTargets::default();
        let view = ready(Some(user_with_role("agent")));
        assert_eq!(protected(&view, &targets), GuardDecision::Allow);
    }

    #[test]
    fn test_admin_only_redirects_non_admin_to_dashboard() {
        let targets = RouteTargets::default();
        let view = ready(Some(user_with_role("agent")));
        assert_eq!(
            admin_only(&view, &targets),
            GuardDecision::Redirect("/dashboard".to_string())
        );
    }

    #[test]
    fn test_admin_only_still_sends_anonymous_to_login() {
        let targets = RouteTargets::default();
        assert_eq!(
            admin_only(&ready(None), &targets),
            GuardDecision::Redirect("/login".to_string())
        );
    }

    #[test]
    fn test_admin_only_allows_admin() {
        let targets = RouteTargets::default();
        let view = ready(Some(user_with_role("admin")));
        assert_eq!(admin_only(&view, &targets), GuardDecision::Allow);
    }

    #[test]
    fn test_public_only_redirects_signed_in_users_away() {
        let targets = RouteTargets::default();
        let view = ready(Some(user_with_role("agent")));
        assert_eq!(
            public_only(&view, &targets),
            GuardDecision::Redirect("/dashboard".to_string())
        );
        assert_eq!(public_only(&ready(None), &targets), GuardDecision::Allow);
        assert_eq!(public_only(&pending(), &targets), GuardDecision::Wait);
    }

    #[test]
    fn test_dashboard_selection_by_role() {
        assert_eq!(
            dashboard_for(&ready(Some(user_with_role("admin")))),
            DashboardView::Admin
        );
        assert_eq!(
            dashboard_for(&ready(Some(user_with_role("agent")))),
            DashboardView::Agent
        );
        assert_eq!(
            dashboard_for(&ready(Some(user_with_role("viewer")))),
            DashboardView::Standard
        );
        assert_eq!(dashboard_for(&ready(None)), DashboardView::Standard);
    }

    #[test]
    fn test_custom_redirect_targets_flow_through() {
        let targets = RouteTargets {
            login: "/signin".to_string(),
            dashboard: "/home".to_string(),
            properties: "/listings".to_string(),
        };
        assert_eq!(
            protected(&ready(None), &targets),
            GuardDecision::Redirect("/signin".to_string())
        );
        let agent = ready(Some(user_with_role("agent")));
        assert_eq!(
            admin_only(&agent, &targets),
            GuardDecision::Redirect("/home".to_string())
        );
    }
}
