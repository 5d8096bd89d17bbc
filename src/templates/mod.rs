//! Embedded site templates rendered with Tera
//!
//! All templates ship inside the binary; there is no theme directory to
//! resolve at runtime.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

/// The embedded stylesheet served at /assets/style.css
pub const STYLESHEET: &str = include_str!("site/assets/style.css");

/// The embedded favicon served at /assets/favicon.svg
pub const FAVICON: &str = include_str!("site/assets/favicon.svg");

/// Template renderer with all site templates loaded
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with the embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping stays on; pre-rendered markdown and JSON-LD are the
        // only values the templates mark `safe`
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("about.html", include_str!("site/about.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("404.html", include_str!("site/404.html")),
            ("partials/head.html", include_str!("site/partials/head.html")),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/pager.html",
                include_str!("site/partials/pager.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("status_label", status_label_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    Ok(tera::Value::String(crate::content::strip_html(&s)))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Tera filter: human-readable label for a serialized project status
fn status_label_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let status: crate::content::ProjectStatus = serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::msg(format!("status_label: {}", e)))?;
    Ok(tera::Value::String(status.label().to_string()))
}

/// Tera filter: format a YYYY-MM-DD date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "long".to_string(),
    };

    // Accept both plain dates and RFC 3339 timestamps
    let day = s.get(..10).unwrap_or(s.as_str());
    if format == "long" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %-d, %Y").to_string()));
        }
    } else if format == "short" {
        if chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok() {
            return Ok(tera::Value::String(day.to_string()));
        }
    }

    Ok(tera::Value::String(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        // add_raw_templates parses everything eagerly
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_truncate_chars_filter() {
        let value = tera::Value::String("abcdefghij".to_string());
        let mut args = HashMap::new();
        args.insert("length".to_string(), tera::Value::from(4));
        let out = truncate_chars_filter(&value, &args).unwrap();
        assert_eq!(out.as_str().unwrap(), "abcd…");
    }

    #[test]
    fn test_status_label_filter() {
        let value = tera::Value::String("in-progress".to_string());
        let out = status_label_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out.as_str().unwrap(), "In progress");

        let bogus = tera::Value::String("abandoned".to_string());
        assert!(status_label_filter(&bogus, &HashMap::new()).is_err());
    }

    #[test]
    fn test_date_format_filter() {
        let value = tera::Value::String("2024-03-01".to_string());
        let out = date_format_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out.as_str().unwrap(), "March 1, 2024");
    }
}
