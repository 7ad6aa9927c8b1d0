//! Company code derivation
//!
//! When a company is created without a `code`, one is derived from its name.

use regex::Regex;
use std::sync::OnceLock;

/// Turn a display name into a URL-safe lowercase token
///
/// Runs of anything other than ASCII letters and digits collapse into a
/// single `-`; leading and trailing separators are dropped.
///
/// # Examples
///
/// ```
/// use biztime::core::slug::slugify;
///
/// assert_eq!(slugify("New Company"), "new-company");
/// assert_eq!(slugify("  AT&T  Inc. "), "at-t-inc");
/// assert_eq!(slugify("IBM"), "ibm");
/// ```
pub fn slugify(name: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap());

    let lowered = name.to_lowercase();
    separators
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
