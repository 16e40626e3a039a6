use tracing::debug;

/// Characters that must not appear in a file name written into a container.
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '(', ')', ' '];

/// Returns `true` if `c` is replaced by [`sanitize_file_name`].
pub fn is_forbidden_char(c: char) -> bool {
    FORBIDDEN.contains(&c)
}

/// Replaces every forbidden character in `name` with `_`, one for one.
///
/// The mapping is idempotent and preserves the character count, so an
/// empty name stays empty and a non-empty name stays non-empty.
pub fn sanitize_file_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if is_forbidden_char(c) { '_' } else { c })
        .collect();

    if sanitized != name {
        debug!(original = %name, sanitized = %sanitized, "sanitized file name");
    }

    sanitized
}
