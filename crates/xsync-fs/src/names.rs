//! Name sanitization and normalization
//!
//! Remote object names are free-form; file names are not. The default
//! sanitizer maps every non-alphanumeric character to an underscore, and
//! the snake-case normalizer additionally lowercases and splits camelCase
//! boundaries. The search index stores both variants for every object so
//! queries can be normalized once and matched cheaply.

/// Replace every non-alphanumeric character with an underscore.
///
/// Case is preserved. Idempotent.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Convert a name to snake_case.
///
/// Lowercases, splits camelCase boundaries, and collapses runs of
/// non-alphanumeric characters into single underscores. Idempotent.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower_or_digit = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if ch.is_ascii_uppercase() {
                if prev_lower_or_digit {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
                prev_lower_or_digit = false;
            } else {
                out.push(ch);
                prev_lower_or_digit = true;
            }
        } else {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower_or_digit = false;
        }
    }
    out
}

/// Sanitize each `/`-separated segment of a path, preserving separators.
pub fn sanitize_path(path: &str) -> String {
    path.split('/').map(sanitize).collect::<Vec<_>>().join("/")
}

/// Snake-case each `/`-separated segment of a path, preserving separators.
pub fn snake_path(path: &str) -> String {
    path.split('/').map(snake_case).collect::<Vec<_>>().join("/")
}

/// Remove URL placeholder braces from an endpoint path segment.
///
/// `{user_id}` becomes `user_id` before sanitization, so placeholder
/// segments keep their parameter name in the generated file name.
pub fn strip_placeholders(segment: &str) -> String {
    segment.replace(['{', '}'], "")
}
