/// Returns `true` for names that would not stay inside the directory they
/// are joined to (`.` and `..`).
///
/// Sanitized names never contain `/`, so these two are the only way a
/// joined path can resolve outside the destination directory.
pub fn is_traversal_name(name: &str) -> bool {
    name == "." || name == ".."
}

/// Joins a remote directory and a file name into a cleaned POSIX path.
///
/// Remote containers always use `/` separators regardless of the host OS,
/// so this works on strings rather than [`std::path::Path`]. The result
/// is lexically cleaned: repeated and trailing separators, `.` segments
/// and resolvable `..` segments are removed.
pub fn join_remote_path(dir: &str, name: &str) -> String {
    let absolute = dir.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in dir.split('/').chain(name.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `/..` is `/`.
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_simple_dir() {
        assert_eq!(join_remote_path("/tmp", "a.txt"), "/tmp/a.txt");
    }

    #[test]
    fn trailing_slash_collapsed() {
        assert_eq!(join_remote_path("/tmp/", "a.txt"), "/tmp/a.txt");
        assert_eq!(join_remote_path("/data//uploads///", "a.txt"), "/data/uploads/a.txt");
    }

    #[test]
    fn root_dir() {
        assert_eq!(join_remote_path("/", "a.txt"), "/a.txt");
    }

    #[test]
    fn dot_segments_cleaned() {
        assert_eq!(join_remote_path("/srv/./app/../data", "x"), "/srv/data/x");
    }

    #[test]
    fn parent_above_root_stays_at_root() {
        assert_eq!(join_remote_path("/../..", "x"), "/x");
    }

    #[test]
    fn relative_dir_kept_relative() {
        assert_eq!(join_remote_path("uploads", "a.txt"), "uploads/a.txt");
        assert_eq!(join_remote_path("../up", "a.txt"), "../up/a.txt");
    }

    #[test]
    fn empty_everything_is_dot() {
        assert_eq!(join_remote_path("", ""), ".");
    }

    #[test]
    fn traversal_names() {
        assert!(is_traversal_name("."));
        assert!(is_traversal_name(".."));
        assert!(!is_traversal_name("..."));
        assert!(!is_traversal_name(".bashrc"));
        assert!(!is_traversal_name("a.txt"));
    }
}
