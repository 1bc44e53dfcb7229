//! Destination URL normalization.

/// Normalizes a destination URL.
///
/// Prepends `https://` unless the input already starts with `http://` or
/// `https://`. Nothing else is validated or rewritten: the stored value is
/// exactly what the redirect will send.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_destination("example.com/x"), "https://example.com/x");
/// assert_eq!(normalize_destination("http://example.com"), "http://example.com");
/// ```
pub fn normalize_destination(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}
