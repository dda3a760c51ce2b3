//! Extract a human-readable message from a failed API response body.

pub(crate) const PREVIEW_CHARS: usize = 200;

/// Figma error bodies look like `{"status":403,"err":"Invalid token"}`; some
/// endpoints use `message` instead. Falls back to the raw text, then `HTTP <code>`.
pub(crate) fn error_message(code: u32, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for key in ["err", "message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }
    match std::str::from_utf8(body).map(str::trim) {
        Ok(text) if !text.is_empty() => truncate(text, PREVIEW_CHARS),
        _ => format!("HTTP {}", code),
    }
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        text.chars().take(max_chars).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
