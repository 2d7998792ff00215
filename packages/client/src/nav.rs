use common::SessionUser;

use crate::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initial(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignOut,
}

impl AuthAction {
    pub fn label(self) -> &'static str {
        match self {
            AuthAction::SignIn => "Sign in",
            AuthAction::SignOut => "Sign out",
        }
    }
}

/// Top navigation bar. The mobile menu closes whenever a link is followed.
#[derive(Debug, Clone, Default)]
pub struct NavBar {
    user: Option<SessionUser>,
    menu_open: bool,
}

impl NavBar {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user,
            menu_open: false,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn links(&self) -> Vec<NavLink> {
        match self.user {
            Some(_) => vec![NavLink {
                label: "Projects",
                href: "/projects",
            }],
            None => Vec::new(),
        }
    }

    pub fn mobile_links(&self) -> Vec<NavLink> {
        match self.user {
            Some(_) => vec![NavLink {
                label: "My Projects",
                href: "/projects",
            }],
            None => Vec::new(),
        }
    }

    /// Avatar image, or the upper-cased first letter of the name with `U`
    /// as the fallback.
    pub fn avatar(&self) -> Option<Avatar> {
        let user = self.user.as_ref()?;
        if let Some(image) = &user.image {
            return Some(Avatar::Image(image.clone()));
        }
        let initial = user
            .name
            .as_deref()
            .and_then(|name| name.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U');
        Some(Avatar::Initial(initial))
    }

    pub fn profile_href(&self) -> Option<String> {
        self.user.as_ref().map(|u| format!("/profile/{}", u.id))
    }

    pub fn auth_action(&self) -> AuthAction {
        match self.user {
            Some(_) => AuthAction::SignOut,
            None => AuthAction::SignIn,
        }
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn follow<N: Navigator + ?Sized>(&mut self, navigator: &N, href: &str) {
        self.menu_open = false;
        navigator.push(href);
    }
}
