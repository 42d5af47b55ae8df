//! Wildcard-aware permission matching.
//!
//! Permissions are segment paths such as `users:read` or `billing.invoices.export`.
//! `:` and `.` are both accepted as delimiters. A granted segment of `*` matches
//! any single required segment at the same position; there is no prefix
//! matching, so `posts:*` does not cover `posts:comments:delete`.

const WILDCARD: &str = "*";

fn segments(permission: &str) -> impl Iterator<Item = &str> {
    permission.split([':', '.'])
}

/// Returns true if `granted` satisfies `required`.
///
/// # Examples
///
/// ```
/// use request_guard::permission::matches;
///
/// assert!(matches("a:b", "a:*"));
/// assert!(!matches("a:b", "a:c"));
/// assert!(!matches("a:b:c", "a:*"));
/// ```
pub fn matches(required: &str, granted: &str) -> bool {
    let mut required = segments(required);
    let mut granted = segments(granted);

    loop {
        match (required.next(), granted.next()) {
            (None, None) => return true,
            (Some(r), Some(g)) if g == WILDCARD || g == r => continue,
            _ => return false,
        }
    }
}

/// Returns true if any permission in `granted` satisfies `required`.
pub fn is_granted<'a, I>(required: &str, granted: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    granted.into_iter().any(|g| matches(required, g))
}
