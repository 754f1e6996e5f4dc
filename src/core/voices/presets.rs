//! Built-in voice presets supported directly by the upstream model.

/// Preset identifiers the synthesis endpoint accepts without a cloned
/// voice profile.
pub const BUILTIN_PRESETS: &[&str] = &["default", "male", "female", "child"];

/// Whether `name` is a built-in preset (case-sensitive, matching the
/// upstream identifiers).
pub fn is_builtin_preset(name: &str) -> bool {
    BUILTIN_PRESETS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_presets() {
        assert!(is_builtin_preset("default"));
        assert!(is_builtin_preset("female"));
        assert!(!is_builtin_preset("Female"));
        assert!(!is_builtin_preset("alice"));
    }
}
