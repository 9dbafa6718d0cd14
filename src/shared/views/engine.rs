//! Template engine for server-rendered pages using Jinja2 syntax.
//!
//! Templates are compiled into the binary and registered once on first use.

use std::sync::OnceLock;

use axum::http::StatusCode;
use axum::response::Html;
use minijinja::{context, AutoEscape, Environment, Value};
use thiserror::Error;

use crate::shared::validation::escape_html;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// (name, source) of every page template
const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../../../templates/views/layout.html")),
    (
        "form_errors.html",
        include_str!("../../../templates/views/form_errors.html"),
    ),
    (
        "category_list.html",
        include_str!("../../../templates/views/category_list.html"),
    ),
    (
        "category_detail.html",
        include_str!("../../../templates/views/category_detail.html"),
    ),
    (
        "category_form.html",
        include_str!("../../../templates/views/category_form.html"),
    ),
    (
        "category_delete.html",
        include_str!("../../../templates/views/category_delete.html"),
    ),
    ("item_list.html", include_str!("../../../templates/views/item_list.html")),
    (
        "item_detail.html",
        include_str!("../../../templates/views/item_detail.html"),
    ),
    ("item_form.html", include_str!("../../../templates/views/item_form.html")),
    (
        "item_delete.html",
        include_str!("../../../templates/views/item_delete.html"),
    ),
    ("error.html", include_str!("../../../templates/views/error.html")),
    (
        "not_found.html",
        include_str!("../../../templates/views/not_found.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    // User input is escaped when it is validated, before it is stored
    env.set_auto_escape_callback(|_| AutoEscape::None);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with the given context.
///
/// # Example
/// ```ignore
/// use minijinja::context;
///
/// let page = render("category_list.html", context! { title => "Category List", categories })?;
/// ```
pub fn render(template_name: &str, ctx: Value) -> Result<Html<String>, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map(Html)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

/// Render the shared error page; `message` is escaped here
pub fn render_error_page(status: StatusCode, message: &str) -> Result<Html<String>, TemplateError> {
    let title = status.canonical_reason().unwrap_or("Error");

    render(
        "error.html",
        context! {
            title => title,
            status => status.as_u16(),
            message => escape_html(message),
        },
    )
}

pub fn render_not_found_page() -> Result<Html<String>, TemplateError> {
    render("not_found.html", context! { title => "404" })
}
