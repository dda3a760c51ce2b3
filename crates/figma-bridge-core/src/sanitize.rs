//! Filename sanitization for caller-supplied asset names.

use crate::storage::TEMP_SUFFIX;

/// Sanitizes a caller-supplied file name so it stays inside the target directory.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores (no `..`, no hidden files)
/// - Limits length so that the name plus the `.part` suffix fits in 255 bytes (NAME_MAX)
///
/// Returns an empty string when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> String {
    const NAME_MAX: usize = 255 - TEMP_SUFFIX.len();

    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() <= NAME_MAX {
        return trimmed.to_string();
    }

    // Shorten the stem, keep a short extension so the format stays recognizable.
    let (stem, ext) = match trimmed.rfind('.') {
        Some(dot) if trimmed.len() - dot <= 16 => trimmed.split_at(dot),
        _ => (trimmed, ""),
    };
    let mut out = cut_on_char_boundary(stem, NAME_MAX - ext.len()).to_string();
    out.push_str(ext);
    out
}

fn cut_on_char_boundary(s: &str, max: usize) -> &str {
    let mut take = max.min(s.len());
    while take > 0 && !s.is_char_boundary(take) {
        take -= 1;
    }
    &s[..take]
}
