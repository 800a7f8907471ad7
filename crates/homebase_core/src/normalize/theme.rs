//! Theme resolution for modern names and legacy literal style objects.
//!
//! Legacy documents stored the whole palette inline. Only the accent color is
//! compared; anything that matches no known theme falls back to
//! `DEFAULT_THEME`.

use crate::model::settings::DEFAULT_THEME;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Known themes and their accent colors.
pub const THEMES: &[(&str, &str)] = &[
    ("midnight", "#7c3aed"),
    ("daylight", "#2563eb"),
    ("forest", "#16a34a"),
    ("sunset", "#ea580c"),
    ("ocean", "#0891b2"),
    ("rose", "#e11d48"),
    ("graphite", "#64748b"),
];

const ACCENT_KEYS: &[&str] = &["accent", "accentColor", "primary", "primaryColor"];

static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid hex color regex")
});

/// Returns whether `name` is a known theme.
pub fn is_known_theme(name: &str) -> bool {
    THEMES.iter().any(|(known, _)| *known == name)
}

/// Maps a stored theme value to a known theme name.
pub fn resolve_theme(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(name)) => {
            let name = name.trim().to_ascii_lowercase();
            if is_known_theme(&name) {
                name
            } else {
                DEFAULT_THEME.to_string()
            }
        }
        Some(Value::Object(style)) => ACCENT_KEYS
            .iter()
            .filter_map(|key| style.get(*key).and_then(Value::as_str))
            .find_map(theme_for_accent)
            .unwrap_or(DEFAULT_THEME)
            .to_string(),
        _ => DEFAULT_THEME.to_string(),
    }
}

/// Finds the theme whose accent equals `color`.
pub fn theme_for_accent(color: &str) -> Option<&'static str> {
    let normalized = normalize_hex(color)?;
    THEMES
        .iter()
        .find(|(_, accent)| *accent == normalized)
        .map(|(name, _)| *name)
}

/// Lowercase `#rrggbb`, expanding the three-digit form.
fn normalize_hex(color: &str) -> Option<String> {
    let caps = HEX_COLOR_RE.captures(color.trim())?;
    let digits = caps[1].to_ascii_lowercase();
    if digits.len() == 3 {
        let expanded = digits.chars().flat_map(|c| [c, c]).collect::<String>();
        return Some(format!("#{expanded}"));
    }
    Some(format!("#{digits}"))
}

#[cfg(test)]
mod tests {
    use super::{resolve_theme, theme_for_accent};
    use crate::model::settings::DEFAULT_THEME;
    use serde_json::json;

    #[test]
    fn modern_names_pass_through_case_insensitively() {
        assert_eq!(resolve_theme(Some(&json!("Forest"))), "forest");
        assert_eq!(resolve_theme(Some(&json!("neon"))), DEFAULT_THEME);
    }

    #[test]
    fn legacy_style_object_maps_by_accent() {
        let legacy = json!({ "background": "#000", "accent": "#16A34A" });
        assert_eq!(resolve_theme(Some(&legacy)), "forest");

        let unknown = json!({ "accent": "#123456" });
        assert_eq!(resolve_theme(Some(&unknown)), DEFAULT_THEME);
    }

    #[test]
    fn short_hex_is_expanded() {
        assert_eq!(theme_for_accent("#fff"), None);
        assert_eq!(theme_for_accent("2563EB"), Some("daylight"));
    }
}
