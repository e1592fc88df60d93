//! URL slug generation for category and thread titles.

/// Generate a URL-safe slug from a title.
///
/// Lower-cases ASCII letters, turns every run of other characters into a
/// single hyphen, and trims hyphens from both ends.
pub fn slugify(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = true;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}
