//! Channel name rules.

use crate::Error;

/// Rejects empty names, empty segments (`.app`, `app..http`, `app.`) and
/// names containing whitespace or control characters.
///
/// # Errors
/// `Error::InvalidChannel` naming the offending input.
pub fn validate(name: &str) -> Result<(), Error> {
    let invalid = name.is_empty()
        || name.split('.').any(str::is_empty)
        || name.chars().any(|c| c.is_whitespace() || c.is_control());
    if invalid {
        return Err(Error::InvalidChannel(name.to_string()));
    }
    Ok(())
}

/// Every dot-prefix of `name`, shortest first, ending with `name` itself.
pub fn prefixes(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('.')
        .map(move |(idx, _)| &name[..idx])
        .chain(std::iter::once(name))
}
