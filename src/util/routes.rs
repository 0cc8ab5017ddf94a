//! Static route table consulted by the navigation guard.
//!
//! DESIGN
//! ======
//! Leptos' `<Routes>` decides which view renders; this table decides who may
//! see it. Descriptors are registered once in [`AppRoutes::dashboard`] and
//! never change afterwards.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use crate::net::resource;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const REDIRECT_PARAM: &str = "redirect";

/// Screens of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Users,
    Projects,
    ProjectDetail,
    Versions,
    Vulnerabilities,
    Cicd,
    Risk,
    System,
    Login,
}

impl View {
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "Users",
            Self::Projects => "Projects",
            Self::ProjectDetail => "Project",
            Self::Versions => "Versions",
            Self::Vulnerabilities => "Vulnerabilities",
            Self::Cicd => "CI/CD",
            Self::Risk => "Risk",
            Self::System => "System",
            Self::Login => "Sign in",
        }
    }

    /// REST collection backing the screen's main listing, if any.
    #[must_use]
    pub fn collection(self) -> Option<&'static str> {
        match self {
            Self::Users => Some(resource::USERS),
            Self::Projects | Self::ProjectDetail => Some(resource::PROJECTS),
            Self::Versions => Some(resource::VERSIONS),
            Self::Vulnerabilities => Some(resource::VULNERABILITIES),
            Self::Cicd => Some(resource::PIPELINES),
            Self::Risk => Some(resource::RISK_ALERTS),
            Self::System => Some(resource::NOTIFICATIONS),
            Self::Dashboard | Self::Login => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern; `:name` segments match any single segment.
    pub pattern: &'static str,
    pub view: View,
    pub requires_auth: bool,
}

impl RouteDescriptor {
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(self.pattern);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Path portion of a location, without query or fragment.
#[must_use]
pub fn path_only(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}

/// Join router `pathname` and `search` into one location string.
#[must_use]
pub fn full_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() {
        pathname.to_owned()
    } else {
        format!("{pathname}?{search}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppRoutes {
    routes: Vec<RouteDescriptor>,
    login_path: &'static str,
    home_path: &'static str,
}

impl AppRoutes {
    #[must_use]
    pub fn new(routes: Vec<RouteDescriptor>, login_path: &'static str, home_path: &'static str) -> Self {
        Self { routes, login_path, home_path }
    }

    /// The dashboard's route table.
    #[must_use]
    pub fn dashboard() -> Self {
        let guarded = |pattern, view| RouteDescriptor { pattern, view, requires_auth: true };
        Self::new(
            vec![
                guarded("/", View::Dashboard),
                guarded("/users", View::Users),
                guarded("/projects", View::Projects),
                guarded("/projects/:id", View::ProjectDetail),
                guarded("/versions", View::Versions),
                guarded("/vulnerabilities", View::Vulnerabilities),
                guarded("/cicd", View::Cicd),
                guarded("/risk", View::Risk),
                guarded("/system", View::System),
                RouteDescriptor { pattern: LOGIN_PATH, view: View::Login, requires_auth: false },
            ],
            LOGIN_PATH,
            HOME_PATH,
        )
    }

    #[must_use]
    pub fn login_path(&self) -> &'static str {
        self.login_path
    }

    #[must_use]
    pub fn home_path(&self) -> &'static str {
        self.home_path
    }

    /// Descriptor for a location; query and fragment are ignored.
    #[must_use]
    pub fn resolve(&self, location: &str) -> Option<&RouteDescriptor> {
        let path = path_only(location);
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Unknown locations are public; the router's fallback renders them.
    #[must_use]
    pub fn requires_auth(&self, location: &str) -> bool {
        self.resolve(location).is_some_and(|route| route.requires_auth)
    }

    #[must_use]
    pub fn is_login(&self, location: &str) -> bool {
        segments(path_only(location)).eq(segments(self.login_path))
    }

    /// Login location carrying `target` as the `redirect` parameter.
    #[must_use]
    pub fn login_location(&self, target: &str) -> String {
        format!("{}?{REDIRECT_PARAM}={}", self.login_path, urlencoding::encode(target))
    }

    /// Where to go after signing in.
    ///
    /// Only same-origin absolute paths are honored, and never the login screen
    /// itself; anything else lands on home.
    #[must_use]
    pub fn post_login_target(&self, redirect: Option<&str>) -> String {
        match redirect.map(str::trim) {
            Some(target)
                if target.starts_with('/')
                    && !target.starts_with("//")
                    && !target.starts_with("/\\")
                    && !self.is_login(target) =>
            {
                target.to_owned()
            }
            _ => self.home_path.to_owned(),
        }
    }
}
