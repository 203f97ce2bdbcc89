//! Placeholder visualization payload. No chart is rendered server-side;
//! the accessors return a fixed opaque image.

/// Base64-encoded 1x1 transparent PNG.
pub const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z/C/HgAGgwJ/lK3Q6wAAAABJRU5ErkJggg==";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_base64_shaped() {
        assert!(!PLACEHOLDER_PNG.is_empty());
        assert!(PLACEHOLDER_PNG
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '='));
    }
}
