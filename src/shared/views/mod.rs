//! Server-rendered pages.
//!
//! Templates live in `templates/views/` and use Jinja2 syntax. Every page
//! extends `layout.html`.

mod engine;

pub use engine::{render, render_error_page, render_not_found_page, TemplateError};
