//! File name sanitization.
//!
//! Catalog titles are free text. Before they become file names every
//! character outside ASCII letters, ASCII digits, whitespace, `-` and `_` is
//! dropped, whitespace runs become a single `_`, and an empty result becomes
//! [`DEFAULT_FILE_NAME`].
//!
//! `_` is kept on purpose, beyond the letters, digits, whitespace and `-` of
//! the plain rule: whitespace turns into `_`, so dropping it would make a
//! second pass change the name (`"a b"` to `"a_b"` to `"ab"`). Sanitizing an
//! already sanitized name is a no-op.
//!
//! Accented letters are dropped as well, so `"Promo Verão 2024.png"` becomes
//! `"Promo_Vero_2024png"` and not `"Promo_Verão_2024png"`. Non-ASCII letters
//! are never kept, which keeps names portable across filesystems.

/// Name used when sanitization leaves nothing behind.
pub const DEFAULT_FILE_NAME: &str = "file";

/// Derive a filesystem-safe name from a title.
///
/// ```rust
/// use streamdl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Promo  Verão! 2024.png"), "Promo_Vero_2024png");
/// assert_eq!(sanitize_filename("???"), "file");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
    {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }

    let out = out.trim();
    if out.is_empty() {
        String::from(DEFAULT_FILE_NAME)
    } else {
        out.to_string()
    }
}
