//! Backend-relative path helpers.
//!
//! Paths handed to a [`crate::FileSystem`] use `/` as their only separator and
//! are always relative to the backend root; a leading `/` is accepted and
//! means the root, not a host absolute path.
//!
//! A `..` in a caller's path is resolved lexically against the components
//! before it and never climbs above the root, so `link/..` names the
//! directory holding `link` whatever `link` points to. A `..` inside a
//! symbolic link's target is resolved by the backend from the link's
//! directory, the way the host resolves it.

use crate::{Errno, VfsResult, translate::Platform};

/// Rejects paths no backend can represent.
pub fn validate(path: &str) -> VfsResult<()> {
    if path.contains('\0') {
        return Err(Errno::Inval);
    }
    Ok(())
}

/// Non-empty components of `path`, with `.` dropped. `..` is kept so the
/// backend can resolve it against its own tree.
pub fn components(path: &str) -> impl DoubleEndedIterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".")
}

/// Components of `path` with `..` resolved lexically and clamped at the
/// root.
pub fn normalize(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for component in components(path) {
        if component == ".." {
            parts.pop();
        } else {
            parts.push(component);
        }
    }
    parts
}

/// True when `path` names the root once normalized: `""`, `/`, `.`, `a/..`
/// and so on.
pub fn is_root(path: &str) -> bool {
    normalize(path).is_empty()
}

/// Rewrites native separators to `/` for values read back from `platform`.
pub fn to_slash(path: &str, platform: Platform) -> String {
    match platform {
        Platform::Windows => path.replace('\\', "/"),
        Platform::Posix => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_skip_empty_and_dot() {
        let parts: Vec<_> = components("/a//./b/../c/").collect();
        assert_eq!(parts, vec!["a", "b", "..", "c"]);
    }

    #[test]
    fn root_spellings() {
        assert!(is_root(""));
        assert!(is_root("."));
        assert!(is_root("/"));
        assert!(is_root("./."));
        assert!(is_root("a/.."));
        assert!(is_root("../.."));
        assert!(!is_root("a"));
    }

    #[test]
    fn dot_dot_is_lexical_and_clamped() {
        assert_eq!(normalize("a/b/../c"), vec!["a", "c"]);
        assert_eq!(normalize("../../a"), vec!["a"]);
        assert_eq!(normalize("link/.."), Vec::<&str>::new());
        assert_eq!(normalize("/a/./b/"), vec!["a", "b"]);
    }

    #[test]
    fn nul_is_invalid() {
        assert_eq!(validate("a\0b"), Err(Errno::Inval));
        assert_eq!(validate("a/b"), Ok(()));
    }

    #[test]
    fn separators_normalized_only_for_windows() {
        assert_eq!(to_slash(r"..\a\b", Platform::Windows), "../a/b");
        assert_eq!(to_slash(r"a\b", Platform::Posix), r"a\b");
    }
}
