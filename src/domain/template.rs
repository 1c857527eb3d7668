//! Template system for reminder emails

use crate::domain::locale::{format_date_to_portuguese, format_short_date};
use crate::error::{EstreiaError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

// Built-in template constants
const REMINDER_HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Lembrete de Estreia</title>
  <style>
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f5f5f5; }
    .container { background-color: white; border-radius: 8px; padding: 30px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); }
    .header { text-align: center; margin-bottom: 30px; }
    .movie-title { font-size: 28px; font-weight: bold; color: #8E4EC6; margin-bottom: 10px; }
    .release-date { font-size: 18px; color: #666; margin-bottom: 20px; }
    .movie-image { max-width: 300px; width: 100%; height: auto; border-radius: 8px; margin: 20px auto; display: block; }
    .message { font-size: 16px; margin-bottom: 30px; text-align: center; }
    .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 14px; color: #666; text-align: center; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1 class="movie-title">🎬 {TITLE}</h1>
      <p class="release-date">Estreia hoje - {RELEASE_DATE}</p>
    </div>
    {IMAGE}
    <div class="message">
      <p>Olá!</p>
      <p>Hoje é o grande dia! <strong>{TITLE}</strong> está estreando nos cinemas.</p>
      <p>Não perca a oportunidade de assistir a este filme que você adicionou à sua lista.</p>
    </div>
    <div class="footer">
      <p>Este é um lembrete automático do Cubos Movies.</p>
      <p>Se você não deseja receber mais lembretes, entre em contato conosco.</p>
    </div>
  </div>
</body>
</html>
"#;

const REMINDER_TEXT_TEMPLATE: &str = "🎬 Lembrete: {TITLE} estreia hoje!

Olá!

Hoje é o grande dia! {TITLE} está estreando nos cinemas.
Não perca a oportunidade de assistir a este filme que você adicionou à sua lista.

Data de estreia: {RELEASE_DATE}

Este é um lembrete automático do Cubos Movies.
Se você não deseja receber mais lembretes, entre em contato conosco.
";

/// Values substituted into a reminder template
#[derive(Debug, Clone, Copy)]
pub struct ReminderContext<'a> {
    pub title: &'a str,
    pub release_date: NaiveDate,
    pub image_url: Option<&'a str>,
}

/// Template for reminder generation
#[derive(Debug)]
pub struct Template {
    content: String,
    html: bool,
}

impl Template {
    /// Create template from built-in template name
    pub fn from_builtin(template_name: &str) -> Result<Self> {
        let content = match template_name {
            "reminder.html" => REMINDER_HTML_TEMPLATE,
            "reminder.txt" => REMINDER_TEXT_TEMPLATE,
            _ => {
                return Err(EstreiaError::Template(format!(
                    "Unknown template: {}",
                    template_name
                )))
            }
        };

        Ok(Template {
            content: content.to_string(),
            html: is_html_name(template_name),
        })
    }

    /// Create template from custom template file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| EstreiaError::Template(format!("Failed to read template file: {}", e)))?;

        Ok(Template {
            content,
            html: is_html_name(&path.to_string_lossy()),
        })
    }

    /// Render template with reminder variable substitution.
    /// Values are HTML-escaped for `.html` templates.
    pub fn render(&self, ctx: &ReminderContext<'_>) -> String {
        let escape = |value: &str| {
            if self.html {
                escape_html(value)
            } else {
                value.to_string()
            }
        };

        let image = match ctx.image_url {
            Some(url) if self.html => format!(
                r#"<img src="{}" alt="{}" class="movie-image">"#,
                escape_html(url),
                escape_html(ctx.title)
            ),
            Some(url) => url.to_string(),
            None => String::new(),
        };

        substitute(&self.content, |name| match name {
            "TITLE" => Some(escape(ctx.title)),
            "RELEASE_DATE" => Some(format_short_date(ctx.release_date)),
            "RELEASE_DATE_LONG" => Some(format_date_to_portuguese(ctx.release_date)),
            "ISO_DATE" => Some(ctx.release_date.format("%Y-%m-%d").to_string()),
            "IMAGE" => Some(image.clone()),
            _ => None,
        })
    }
}

/// Replace `{NAME}` placeholders in one pass over `content`.
///
/// Substituted values are never scanned again; braces that do not form a
/// known placeholder (CSS blocks, for instance) are copied through.
fn substitute(content: &str, value_of: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let replacement = tail
            .find('}')
            .and_then(|end| value_of(&tail[1..end]).map(|value| (end, value)));
        match replacement {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_html_name(name: &str) -> bool {
    name.ends_with(".html") || name.ends_with(".htm")
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Load template from custom directory or fall back to built-in
pub fn load_template(templates_dir: Option<&Path>, template_name: &str) -> Result<Template> {
    match templates_dir.map(|dir| dir.join(template_name)) {
        Some(custom_path) if custom_path.exists() => Template::from_file(&custom_path),
        _ => Template::from_builtin(template_name),
    }
}
