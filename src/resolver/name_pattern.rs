//! Variable name to path pattern conversion
//!
//! A variable name like `mockUser` should find files named `mock_user.js`,
//! `mocks/user.js`, `mock-user.jsx` and so on. The conversion lowercases the
//! name and turns every word boundary (camelCase humps, `-`, `_`) into a
//! permissive separator that also tolerates plural folder names.

/// Regex fragment inserted at every word boundary: an optional plural
/// suffix followed by any single character.
const BOUNDARY: &str = "(es|s)?.?";

/// Convert an identifier into a lowercase path-matching regex fragment.
///
/// `mockUser` becomes `mock(es|s)?.?user`, which matches `mock_user`,
/// `mocks/user`, `mockuser`, and `mockUser` case-insensitively. The plural
/// suffix is intentionally permissive; over-matching is resolved by the
/// user-facing disambiguation prompt.
pub fn formatted_to_regex(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 8);
    let mut previous_was_word = false;

    for ch in name.chars() {
        if ch == '-' || ch == '_' {
            pattern.push_str(BOUNDARY);
            previous_was_word = false;
            continue;
        }
        if ch.is_uppercase() && previous_was_word {
            pattern.push_str(BOUNDARY);
        }
        for lower in ch.to_lowercase() {
            pattern.push(lower);
        }
        previous_was_word = ch.is_lowercase() || ch.is_ascii_digit();
    }

    pattern
}
