/// Category colours used when an extension does not supply its own.
pub const DEFAULT_COLORS: [&str; 3] = ["#0FBD8C", "#0DA57A", "#0B8E69"];

/// True for `#rgb` and `#rrggbb` hex colours.
pub fn is_hex_color(val: &str) -> bool {
    let Some(digits) = val.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolve one category colour. Missing values take the default; anything
/// that is not a hex colour is passed through as given, the editor decides
/// what to make of it.
pub fn resolve_color(val: Option<&str>, slot: usize) -> String {
    match val.map(str::trim) {
        None | Some("") => DEFAULT_COLORS[slot].to_string(),
        Some(v) => {
            if !is_hex_color(v) {
                tracing::warn!("Colour {} is not a hex colour, passing it through", v);
            }
            v.to_string()
        }
    }
}

/// The three category colours of an extension, defaults applied.
pub fn category_colors(
    color1: Option<&str>,
    color2: Option<&str>,
    color3: Option<&str>,
) -> [String; 3] {
    [
        resolve_color(color1, 0),
        resolve_color(color2, 1),
        resolve_color(color3, 2),
    ]
}
