//! Entity name validation

use std::sync::OnceLock;

use regex::Regex;

use super::errors::{NamespaceError, NamespaceErrorCode, NamespaceResult};

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\p{L}\p{N}_-]+$").expect("static name pattern"))
}

/// Checks a pool, schema or collection name.
///
/// Accepts Unicode letters and digits plus `_` and `-`.
pub fn validate_name(name: &str) -> NamespaceResult<()> {
    if name.is_empty() {
        return Err(NamespaceError::new(NamespaceErrorCode::EmptyName));
    }
    if !name_pattern().is_match(name) {
        return Err(NamespaceError::with_detail(NamespaceErrorCode::InvalidName, name));
    }
    Ok(())
}
