//! Maintenance page rendering.

use std::path::Path;

use common::api::MaintenancePresentation;
use thiserror::Error;

use crate::sanitize;

pub const DEFAULT_TITLE: &str = "Under Maintenance";
pub const DEFAULT_TEXT: &str = "Our website is currently undergoing scheduled maintenance. \
We should be back online shortly. Thank you for your patience.";

/// Last-resort body when the richer renderer is unavailable.
pub const FALLBACK_TEXT: &str =
    "This site is currently under maintenance. Please check back later.";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read maintenance template: {0}")]
    Template(#[from] std::io::Error),
}

/// Render body copy as paragraphs: blank lines split paragraphs, single
/// newlines become line breaks. The text was tag-filtered when stored, so it
/// is interpolated as-is.
fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| format!("<p>{}</p>", block.replace('\n', "<br>\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the built-in maintenance page with defaults for empty fields.
pub fn render_builtin(presentation: &MaintenancePresentation) -> String {
    let title = if presentation.title.is_empty() {
        DEFAULT_TITLE
    } else {
        presentation.title.as_str()
    };
    let text = if presentation.text.is_empty() {
        DEFAULT_TEXT
    } else {
        presentation.text.as_str()
    };

    let header = if presentation.logo_url.is_empty() {
        r#"<div class="icon">&#9881;</div>"#.to_string()
    } else {
        format!(
            r#"<img src="{}" alt="Logo" style="max-width: 200px; margin-bottom: 20px;">"#,
            sanitize::escape_html(&presentation.logo_url)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
body {{
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
    background: #f1f1f1;
    color: #444;
    display: flex;
    justify-content: center;
    align-items: center;
    height: 100vh;
    text-align: center;
}}
.container {{
    max-width: 600px;
    padding: 40px;
    background: #fff;
    border-radius: 8px;
    box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1);
}}
h1 {{
    font-size: 32px;
    color: #222;
    margin-top: 0;
}}
p {{
    font-size: 18px;
    line-height: 1.6;
}}
.icon {{
    font-size: 50px;
    margin-bottom: 20px;
    color: #D94F4F;
}}
</style>
</head>
<body>
<div class="container">
{header}
<h1>{title}</h1>
{body}
</div>
</body>
</html>
"#,
        title = sanitize::escape_html(title),
        header = header,
        body = paragraphs(text),
    )
}

/// Render from a custom template file. Placeholders: `{{title}}`,
/// `{{logo_url}}`, `{{text}}`. A read failure is surfaced so the caller can
/// fall back to the minimal text response.
pub fn render_template(
    path: &Path,
    presentation: &MaintenancePresentation,
) -> Result<String, PageError> {
    let template = std::fs::read_to_string(path)?;

    let title = if presentation.title.is_empty() {
        DEFAULT_TITLE
    } else {
        presentation.title.as_str()
    };
    let text = if presentation.text.is_empty() {
        DEFAULT_TEXT
    } else {
        presentation.text.as_str()
    };

    Ok(template
        .replace("{{title}}", &sanitize::escape_html(title))
        .replace("{{logo_url}}", &sanitize::escape_html(&presentation.logo_url))
        .replace("{{text}}", &paragraphs(text)))
}
