//! Markup for the inside of a block: text escaping, inline style wrappers,
//! entity links and edge whitespace.

use crate::block::{Entity, EntityKind, PropertyKind, ToggleStyle};
use crate::style::CharStyle;

/// Escape characters of a run of block text.
///
/// Newlines become Markdown hard breaks; `&`, `<` and `>` become HTML
/// character references. Every character is escaped exactly once.
pub fn escape_text(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len());
    for &ch in chars {
        match ch {
            '\n' => out.push_str("  \n"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap `content` in a styled `<span>` if the run carries any property style.
pub fn property_markup(style: &CharStyle<'_>, content: String) -> String {
    if !style.has_properties() {
        return content;
    }

    let mut declarations = String::new();
    for kind in PropertyKind::ALL {
        let Some(value) = style.property(kind) else {
            continue;
        };
        match kind {
            PropertyKind::Color => declarations.push_str(&format!("color: {};", value)),
            PropertyKind::BgColor => {
                declarations.push_str(&format!("background-color: {};", value))
            }
            PropertyKind::FontSize => {
                let unit = if is_bare_number(value) { "px" } else { "" };
                declarations.push_str(&format!("font-size: {}{};", value, unit))
            }
            PropertyKind::FontFamily => {
                declarations.push_str(&format!("font-family: {};", value))
            }
        }
    }

    format!("<span style=\"{}\">{}</span>", declarations, content)
}

fn is_bare_number(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Wrap `content` with the marker of every toggle style on the run.
///
/// Styles are applied in [`ToggleStyle::ALL`] order, each wrapping the
/// result of the previous one, so bold ends up innermost.
pub fn toggle_markup(style: &CharStyle<'_>, content: String) -> String {
    ToggleStyle::ALL
        .into_iter()
        .filter(|&toggle| style.has(toggle))
        .fold(content, |inner, toggle| wrap_toggle(toggle, &inner))
}

fn wrap_toggle(style: ToggleStyle, content: &str) -> String {
    match style {
        ToggleStyle::Bold => format!("**{}**", content),
        ToggleStyle::Italic => format!("*{}*", content),
        ToggleStyle::Underline => format!("__{}__", content),
        ToggleStyle::Strikethrough => format!("~~{}~~", content),
        ToggleStyle::Code => format!("`{}`", content),
        ToggleStyle::Superscript => format!("<sup>{}</sup>", content),
        ToggleStyle::Subscript => format!("<sub>{}</sub>", content),
    }
}

/// Built-in entity markup. Unknown entity kinds pass their text through.
pub fn entity_markup(entity: &Entity, text: &str) -> String {
    match entity.kind {
        EntityKind::Link | EntityKind::Mention => {
            format!("[{}]({})", text, entity.data.url.as_deref().unwrap_or_default())
        }
        EntityKind::Image => format!("!({})", entity.data.src.as_deref().unwrap_or_default()),
        EntityKind::Other(_) => text.to_string(),
    }
}

/// Replace each leading space with `nbsp`.
pub fn protect_leading_spaces(text: &str, nbsp: &str) -> String {
    let rest = text.trim_start_matches(' ');
    let count = text.len() - rest.len();
    if count == 0 {
        return text.to_string();
    }
    let mut out = nbsp.repeat(count);
    out.push_str(rest);
    out
}

/// Replace each trailing space with `nbsp`.
pub fn protect_trailing_spaces(text: &str, nbsp: &str) -> String {
    let rest = text.trim_end_matches(' ');
    let count = text.len() - rest.len();
    if count == 0 {
        return text.to_string();
    }
    let mut out = rest.to_string();
    out.push_str(&nbsp.repeat(count));
    out
}
