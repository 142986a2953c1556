//! Template expansion for new ticket contents.
//!
//! Placeholders are `$name` or `${name}`; `$$` is a literal dollar.
//! Unknown placeholders and stray `$` are left untouched.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\})")
        .expect("placeholder pattern compiles")
});

/// Substitute every known placeholder of `template` with its value.
#[must_use]
pub fn expand(template: &str, values: &HashMap<&str, &str>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            if caps.name("escaped").is_some() {
                return "$".to_string();
            }
            let key = caps
                .name("named")
                .or_else(|| caps.name("braced"))
                .map_or("", |m| m.as_str());
            values
                .get(key)
                .map_or_else(|| caps[0].to_string(), |value| (*value).to_string())
        })
        .into_owned()
}
