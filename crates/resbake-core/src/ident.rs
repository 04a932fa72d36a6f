//! Identifier sanitization.
//!
//! Turns a single path segment into a name usable as a namespace or
//! constant identifier in the generated code.

/// Convert one file or directory name into a valid identifier.
///
/// Every maximal run of characters outside `[A-Za-z0-9_]` becomes a single
/// `_`, and a leading digit gets an extra `_` in front. Only ever call this
/// on a single path segment, never on a joined path.
///
/// ```
/// use resbake_core::to_identifier;
///
/// assert_eq!(to_identifier("open.png"), "open_png");
/// assert_eq!(to_identifier("16x16"), "_16x16");
/// ```
pub fn to_identifier(name: &str) -> String {
    let mut ident = String::with_capacity(name.len() + 1);
    let mut in_run = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            ident.push(c);
            in_run = false;
        } else if !in_run {
            ident.push('_');
            in_run = true;
        }
    }

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }

    ident
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_identifier(ident: &str) -> bool {
        !ident.is_empty()
            && !ident.starts_with(|c: char| c.is_ascii_digit())
            && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(to_identifier("icons"), "icons");
        assert_eq!(to_identifier("brick_1x1"), "brick_1x1");
    }

    #[test]
    fn test_runs_collapse() {
        assert_eq!(to_identifier("a b.dat"), "a_b_dat");
        assert_eq!(to_identifier("a -- b"), "a_b");
        assert_eq!(to_identifier("3d-model.bin"), "_3d_model_bin");
        assert_eq!(to_identifier("logo (final).png"), "logo_final_png");
    }

    #[test]
    fn test_leading_digit() {
        assert_eq!(to_identifier("48x48"), "_48x48");
        assert_eq!(to_identifier("0"), "_0");
        // already starts with an underscore after collapsing
        assert_eq!(to_identifier("-3d"), "_3d");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(to_identifier("café.png"), "caf_png");
        assert_eq!(to_identifier("a\u{2014}b"), "a_b");
        assert_eq!(to_identifier("«icon»"), "_icon_");
    }

    #[test]
    fn test_results_are_valid() {
        for name in [
            "48x48",
            "3d-model.bin",
            "a b.dat",
            "…",
            "¿qué?",
            "x",
            "9",
            "Apache2.txt",
        ] {
            let ident = to_identifier(name);
            assert!(is_valid_identifier(&ident), "{name:?} -> {ident:?}");
        }
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(to_identifier(""), "");
        assert!(!is_valid_identifier(""));
    }
}
