//! Which page a front end shows, and how user actions move between pages.

use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    AnonymousHome,
    Login,
    Signup,
    AuthenticatedHome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    OpenLogin,
    OpenSignup,
    BackHome,
    LoginSucceeded,
    SignupSucceeded,
    Logout,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Cannot {action:?} from page {from:?}")]
pub struct NavigationError {
    pub from: Page,
    pub action: NavAction,
}

impl Page {
    pub fn transition(self, action: NavAction) -> Result<Page, NavigationError> {
        use NavAction::*;
        use Page::*;

        match (self, action) {
            (AnonymousHome | Login | Signup, OpenLogin) => Ok(Login),
            (AnonymousHome | Login | Signup, OpenSignup) => Ok(Signup),
            (Login | Signup, BackHome) => Ok(AnonymousHome),
            (Login, LoginSucceeded) => Ok(AuthenticatedHome),
            (Signup, SignupSucceeded) => Ok(Login),
            (AuthenticatedHome, Logout) => Ok(AnonymousHome),
            (AuthenticatedHome, BackHome) => Ok(AuthenticatedHome),
            (from, action) => Err(NavigationError { from, action }),
        }
    }

    /// Where a request for `requested` actually lands given the session state.
    pub fn resolve(requested: Page, authenticated: bool) -> Page {
        match (requested, authenticated) {
            (Page::Login | Page::Signup | Page::AnonymousHome, true) => Page::AuthenticatedHome,
            (Page::AuthenticatedHome, false) => Page::AnonymousHome,
            (page, _) => page,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Page::AnonymousHome | Page::AuthenticatedHome => "/",
            Page::Login => "/login",
            Page::Signup => "/signup",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PAGES: [Page; 4] = [
        Page::AnonymousHome,
        Page::Login,
        Page::Signup,
        Page::AuthenticatedHome,
    ];
    const ALL_ACTIONS: [NavAction; 6] = [
        NavAction::OpenLogin,
        NavAction::OpenSignup,
        NavAction::BackHome,
        NavAction::LoginSucceeded,
        NavAction::SignupSucceeded,
        NavAction::Logout,
    ];

    #[test]
    fn follows_the_happy_path() {
        let page = Page::AnonymousHome
            .transition(NavAction::OpenSignup)
            .and_then(|p| p.transition(NavAction::SignupSucceeded))
            .and_then(|p| p.transition(NavAction::LoginSucceeded))
            .unwrap();
        assert_eq!(page, Page::AuthenticatedHome);
        assert_eq!(
            page.transition(NavAction::Logout).unwrap(),
            Page::AnonymousHome
        );
    }

    #[test]
    fn back_home_from_forms() {
        assert_eq!(
            Page::Login.transition(NavAction::BackHome).unwrap(),
            Page::AnonymousHome
        );
        assert_eq!(
            Page::Signup.transition(NavAction::BackHome).unwrap(),
            Page::AnonymousHome
        );
        assert_eq!(
            Page::AuthenticatedHome
                .transition(NavAction::BackHome)
                .unwrap(),
            Page::AuthenticatedHome
        );
    }

    #[test]
    fn forms_switch_between_each_other() {
        assert_eq!(
            Page::Login.transition(NavAction::OpenSignup).unwrap(),
            Page::Signup
        );
        assert_eq!(
            Page::Signup.transition(NavAction::OpenLogin).unwrap(),
            Page::Login
        );
    }

    #[test]
    fn authenticated_home_only_reachable_through_login() {
        for page in ALL_PAGES {
            for action in ALL_ACTIONS {
                if let Ok(Page::AuthenticatedHome) = page.transition(action) {
                    assert!(
                        page == Page::AuthenticatedHome || action == NavAction::LoginSucceeded,
                        "{:?} --{:?}--> AuthenticatedHome",
                        page,
                        action
                    );
                }
            }
        }
    }

    #[test]
    fn rejects_invalid_transitions() {
        let invalid = [
            (Page::AnonymousHome, NavAction::LoginSucceeded),
            (Page::AnonymousHome, NavAction::Logout),
            (Page::AnonymousHome, NavAction::BackHome),
            (Page::Login, NavAction::SignupSucceeded),
            (Page::Signup, NavAction::LoginSucceeded),
            (Page::AuthenticatedHome, NavAction::OpenLogin),
            (Page::AuthenticatedHome, NavAction::OpenSignup),
            (Page::Login, NavAction::Logout),
        ];
        for (from, action) in invalid {
            assert_eq!(
                from.transition(action),
                Err(NavigationError { from, action })
            );
        }
    }

    #[test]
    fn resolves_requested_pages() {
        assert_eq!(Page::resolve(Page::Login, true), Page::AuthenticatedHome);
        assert_eq!(Page::resolve(Page::Signup, true), Page::AuthenticatedHome);
        assert_eq!(
            Page::resolve(Page::AuthenticatedHome, false),
            Page::AnonymousHome
        );
        assert_eq!(Page::resolve(Page::Login, false), Page::Login);
        assert_eq!(
            Page::resolve(Page::AuthenticatedHome, true),
            Page::AuthenticatedHome
        );
    }
}
