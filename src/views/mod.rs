//! Server-rendered presentation: page layout, list components and formatting.

mod format;
mod table;
pub mod tables;

pub use format::*;
pub use table::*;

use serde::Serialize;
use tera::{Context, Tera};

/// Compiled templates, built once at startup and shared as managed state.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Templates, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../templates/base.html")),
            ("dashboard.html", include_str!("../../templates/dashboard.html")),
            ("login.html", include_str!("../../templates/login.html")),
            ("not_found.html", include_str!("../../templates/not_found.html")),
            ("table.html", include_str!("../../templates/table.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String, tera::Error> {
        self.tera.render(template, &Context::from_serialize(context)?)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct Viewer {
    pub username: String,
    pub role: &'static str,
}

#[derive(Serialize, Debug, Clone)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

impl SummaryCard {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Context shared by every page template.
#[derive(Serialize, Debug, Default)]
pub struct PageContext {
    pub title: String,
    pub viewer: Option<Viewer>,
    pub nav: Vec<NavLink>,
    pub cards: Vec<SummaryCard>,
    /// Pre-rendered components, inserted verbatim.
    pub sections: Vec<String>,
    pub error: Option<String>,
    pub path: Option<String>,
}
