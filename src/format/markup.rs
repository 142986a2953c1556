//! Terminal rendering of ticket markdown.
//!
//! A light renderer: headings, list bullets, fenced code and the trailing
//! `tags:` line get terminal styles. Everything else passes through.

use crossterm::style::Stylize;

/// Render `text` for display; styles are only applied when `styled` is set.
#[must_use]
pub fn render_markup(text: &str, styled: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_code = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let rendered = if trimmed.starts_with("```") {
            in_code = !in_code;
            None
        } else if in_code {
            Some(code_line(line, styled))
        } else if let Some((level, title)) = heading(trimmed) {
            Some(heading_line(level, title, styled))
        } else if let Some(item) = bullet(trimmed) {
            let indent = &line[..line.len() - trimmed.len()];
            let marker = if styled {
                "•".cyan().to_string()
            } else {
                "•".to_string()
            };
            Some(format!("{indent}  {marker} {item}"))
        } else if trimmed.starts_with("tags:") && styled {
            Some(trimmed.dim().to_string())
        } else {
            Some(line.to_string())
        };

        if let Some(rendered) = rendered {
            out.push_str(&rendered);
            out.push('\n');
        }
    }
    out
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        return Some((level, ""));
    }
    rest.strip_prefix(' ').map(|title| (level, title.trim()))
}

fn bullet(line: &str) -> Option<&str> {
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
}

fn heading_line(level: usize, title: &str, styled: bool) -> String {
    if !styled {
        return if level == 1 {
            format!("{title}\n{}", "=".repeat(title.chars().count()))
        } else {
            title.to_string()
        };
    }
    match level {
        1 => title.bold().underlined().magenta().to_string(),
        2 => title.bold().cyan().to_string(),
        _ => title.bold().to_string(),
    }
}

fn code_line(line: &str, styled: bool) -> String {
    if styled {
        format!("    {}", line.dark_grey())
    } else {
        format!("    {line}")
    }
}
