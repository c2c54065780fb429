//! Role-gated page routing.
//!
//! Every page is declared once in [`PAGE_ROUTES`] with the roles allowed to
//! see it and where to send everyone else. Resolution never loops: a denied
//! viewer gets exactly one redirect.

use crate::domain::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Who may see a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePredicate {
    /// Only visitors without a session.
    Anonymous,
    /// Any signed-in user.
    Authenticated,
    Only(Role),
}

impl RolePredicate {
    pub fn check(&self, viewer: Option<Role>) -> Access {
        let allowed = match (self, viewer) {
            (RolePredicate::Anonymous, viewer) => viewer.is_none(),
            (RolePredicate::Authenticated, viewer) => viewer.is_some(),
            (RolePredicate::Only(required), Some(role)) => *required == role,
            (RolePredicate::Only(_), None) => false,
        };
        if allowed {
            Access::Allow
        } else {
            Access::Deny
        }
    }
}

/// Where a denied viewer is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Fixed(&'static str),
    /// The viewer's own dashboard, or the login page without a session.
    RoleHome,
}

impl Fallback {
    pub fn target(&self, viewer: Option<Role>) -> &'static str {
        match self {
            Fallback::Fixed(path) => *path,
            Fallback::RoleHome => home_for(viewer),
        }
    }
}

pub fn home_for(viewer: Option<Role>) -> &'static str {
    viewer.map(|role| role.home_path()).unwrap_or(LOGIN_PATH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    AdminDashboard,
    AdminSchools,
    AdminStudents,
    SchoolDashboard,
    SchoolStudents,
    SchoolFundraisers,
    StudentDashboard,
    Notifications,
}

#[derive(Debug, Clone, Copy)]
pub struct PageRoute {
    pub path: &'static str,
    pub predicate: RolePredicate,
    pub page: Page,
    pub fallback: Fallback,
}

const fn route(
    path: &'static str,
    predicate: RolePredicate,
    page: Page,
    fallback: Fallback,
) -> PageRoute {
    PageRoute {
        path,
        predicate,
        page,
        fallback,
    }
}

pub const PAGE_ROUTES: &[PageRoute] = &[
    route("/", RolePredicate::Anonymous, Page::Login, Fallback::RoleHome),
    route(LOGIN_PATH, RolePredicate::Anonymous, Page::Login, Fallback::RoleHome),
    route("/admin", RolePredicate::Only(Role::Admin), Page::AdminDashboard, Fallback::RoleHome),
    route("/admin/schools", RolePredicate::Only(Role::Admin), Page::AdminSchools, Fallback::RoleHome),
    route("/admin/students", RolePredicate::Only(Role::Admin), Page::AdminStudents, Fallback::RoleHome),
    route("/school", RolePredicate::Only(Role::School), Page::SchoolDashboard, Fallback::RoleHome),
    route("/school/students", RolePredicate::Only(Role::School), Page::SchoolStudents, Fallback::RoleHome),
    route("/school/fundraisers", RolePredicate::Only(Role::School), Page::SchoolFundraisers, Fallback::RoleHome),
    route("/student", RolePredicate::Only(Role::Student), Page::StudentDashboard, Fallback::RoleHome),
    route("/notifications", RolePredicate::Authenticated, Page::Notifications, Fallback::Fixed(LOGIN_PATH)),
];

/// The outcome of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Page),
    Redirect(&'static str),
    NotFound,
}

#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    routes: &'static [PageRoute],
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(PAGE_ROUTES)
    }
}

impl Navigator {
    pub fn new(routes: &'static [PageRoute]) -> Self {
        Self { routes }
    }

    pub fn lookup(&self, path: &str) -> Option<&'static PageRoute> {
        let path = normalize(path);
        self.routes.iter().find(|route| route.path == path)
    }

    pub fn resolve(&self, path: &str, viewer: Option<Role>) -> Navigation {
        match self.lookup(path) {
            None => Navigation::NotFound,
            Some(route) => match route.predicate.check(viewer) {
                Access::Allow => Navigation::Render(route.page),
                Access::Deny => Navigation::Redirect(route.fallback.target(viewer)),
            },
        }
    }
}

/// `""`, `"school/"` and `"/school/"` all name the same page as their slash-trimmed form.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
