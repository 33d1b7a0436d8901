//! Page routing and the login gate, independent of the HTTP layer.

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/";
pub const EMPLOYEES_PATH: &str = "/employees";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Dashboard,
    Employees,
}

impl Page {
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Page::Dashboard),
            LOGIN_PATH => Some(Page::Login),
            EMPLOYEES_PATH => Some(Page::Employees),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Dashboard => "dashboard",
            Page::Employees => "employees",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Page::Login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(&'static str),
}

/// Unknown paths go to the dashboard; protected pages go to the login page
/// until the session flag is set.
pub fn resolve(path: &str, authenticated: bool) -> Navigation {
    match Page::from_path(path) {
        None => Navigation::Redirect(DASHBOARD_PATH),
        Some(page) if page.requires_session() && !authenticated => Navigation::Redirect(LOGIN_PATH),
        Some(page) => Navigation::Render(page),
    }
}
