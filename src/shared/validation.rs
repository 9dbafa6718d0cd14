use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use validator::ValidationErrors;

lazy_static! {
    /// Non-negative amount with at most two fraction digits
    /// - Valid: "9", "9.9", "9.99", "0.50"
    /// - Invalid: "-1", "9.999", ".5", "1e3", "9,99"
    pub static ref PRICE_REGEX: Regex = Regex::new(r"^\d+(\.\d{1,2})?$").unwrap();

    /// Non-negative whole number
    /// - Valid: "0", "5", "120"
    /// - Invalid: "-5", "5.0", "five"
    pub static ref WHOLE_NUMBER_REGEX: Regex = Regex::new(r"^\d+$").unwrap();
}

/// A message attached to one submitted form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: &str, msg: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            msg: msg.into(),
        }
    }
}

/// Flatten a `validator` result into one message per field, in form order.
///
/// `validator` keys its errors by field in a hash map, so `order` decides the
/// order they are shown in; only the first failing rule of a field is kept.
pub fn field_errors(result: Result<(), ValidationErrors>, order: &[&str]) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };
    let by_field = errors.field_errors();

    order
        .iter()
        .filter_map(|field| {
            let first = by_field.get(*field)?.first()?;
            let msg = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            Some(FieldError::new(field, msg))
        })
        .collect()
}

/// Most characters `escape_html` turns a single input character into
pub const MAX_ESCAPE_GROWTH: usize = 6;

/// Stored length bounds for escaped text (`CHECK` constraints in the schema).
///
/// Forms accept at most 100 name and 500 description characters before
/// escaping.
pub const STORED_NAME_MAX_CHARS: usize = 100 * MAX_ESCAPE_GROWTH;
pub const STORED_DESCRIPTION_MAX_CHARS: usize = 500 * MAX_ESCAPE_GROWTH;

/// Add an error for escaped `name`/`description` text that would not fit its
/// column, unless that field already has one
pub fn check_stored_lengths(name: &str, description: &str, errors: &mut Vec<FieldError>) {
    let columns = [
        ("name", "Name", name, STORED_NAME_MAX_CHARS),
        ("description", "Description", description, STORED_DESCRIPTION_MAX_CHARS),
    ];
    for (field, label, value, max) in columns {
        if value.chars().count() > max && !errors.iter().any(|e| e.field == field) {
            errors.push(FieldError::new(field, format!("{} is too long.", label)));
        }
    }
}

/// Replace HTML-significant characters with entities.
///
/// Applied to every text field after validation, so stored values are safe
/// to render verbatim.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}
