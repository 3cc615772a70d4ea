use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback is supported via `{{ env.VAR | default("value") }}`;
/// it is used when the variable is unset. Placeholders on TOML comment lines
/// are left untouched. Any placeholder not scoped with `env.` is an error.
pub fn expand_env(input: &str) -> Result<String, String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        Regex::new(r#"\{\{\s*(?P<scope>[a-zA-Z0-9_]+)\.(?P<name>[a-zA-Z0-9_]+)\s*(?:\|\s*default\("(?P<fallback>[^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    });

    let mut lines = Vec::with_capacity(input.lines().count());

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut failure: Option<String> = None;
        let expanded = placeholder.replace_all(line, |captures: &Captures<'_>| {
            expand_placeholder(captures).unwrap_or_else(|e| {
                failure.get_or_insert(e);
                String::new()
            })
        });

        if let Some(e) = failure {
            return Err(e);
        }

        lines.push(expanded.into_owned());
    }

    let mut output = lines.join("\n");
    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

fn expand_placeholder(captures: &Captures<'_>) -> Result<String, String> {
    let scope = &captures["scope"];
    let name = &captures["name"];

    if scope != "env" {
        return Err(format!("only variables scoped with 'env.' are supported: `{scope}.{name}`"));
    }

    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => captures
            .name("fallback")
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| format!("environment variable not found: `{name}`")),
    }
}
