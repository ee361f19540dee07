//! Path canonicalization.
//!
//! The file system has no real current directory. Every path that is not
//! already absolute is pinned to the synthetic root `./`, which makes exact
//! and prefix comparisons between paths well-defined.
//!
//! Not handled: per-drive current directories (`D:file.ext`) and parent
//! traversal (`../file.ext`). Such paths are normalized like any other
//! relative path and simply never match a known entry.

use std::borrow::Cow;

/// Synthetic root every relative path is pinned to.
pub const CUR_DIR_PREFIX: &str = "./";

pub fn is_separator(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// Checks whether `path` is absolute or explicitly relative to the current directory.
///
/// Rooted forms:
/// * `.` alone, or `.` followed by a separator (`./a`, `.\a`);
/// * a disk designator followed by a separator (`C:\a`, `C:/a`);
/// * a network share (`\\server\share`, `//server/share`).
pub fn is_rooted(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [] => false,
        [b'.'] => true,
        [b'.', next, ..] => is_separator(*next),
        [_, b':', sep, ..] if is_separator(*sep) => true,
        [first, second, ..] => is_separator(*first) && *first == *second,
        _ => false,
    }
}

/// Returns `path` unchanged if it is rooted, otherwise `./` + `path`.
pub fn normalize(path: &str) -> Cow<'_, str> {
    if is_rooted(path) {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("{CUR_DIR_PREFIX}{path}"))
    }
}

/// Checks whether `dir` names a directory that contains `file`.
///
/// `dir` must be a strict prefix of `file` and the prefix must end on a separator
/// boundary, so `./ba` is not the directory of `./bar.hlsl` while `./bar` is the
/// directory of `./bar/file.hlsl`.
pub fn is_dir_of(dir: &str, file: &str) -> bool {
    let (dir, file) = (dir.as_bytes(), file.as_bytes());
    if dir.is_empty() || file.len() <= dir.len() || !file.starts_with(dir) {
        return false;
    }
    is_separator(dir[dir.len() - 1]) || is_separator(file[dir.len()])
}

/// Like [`is_dir_of`], but also true when both paths are equal.
pub fn is_dir_prefix_or_same(dir: &str, path: &str) -> bool {
    dir == path || is_dir_of(dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod rooted {
        use super::*;

        #[test]
        fn test_cur_dir_forms() {
            assert!(is_rooted("."));
            assert!(is_rooted("./main.hlsl"));
            assert!(is_rooted(".\\main.hlsl"));
            assert!(is_rooted("./"));
        }

        #[test]
        fn test_disk_designator() {
            assert!(is_rooted("C:\\shaders\\main.hlsl"));
            assert!(is_rooted("d:/shaders/main.hlsl"));
            assert!(!is_rooted("C:main.hlsl"));
            assert!(!is_rooted("C:"));
        }

        #[test]
        fn test_network_share() {
            assert!(is_rooted("\\\\server\\share\\a.h"));
            assert!(is_rooted("//server/share/a.h"));
            assert!(!is_rooted("\\single\\a.h"));
            assert!(!is_rooted("\\/mixed"));
        }

        #[test]
        fn test_not_rooted() {
            assert!(!is_rooted(""));
            assert!(!is_rooted("main.hlsl"));
            assert!(!is_rooted("inc/a.h"));
            assert!(!is_rooted("..\\a.h"));
            assert!(!is_rooted(".hidden"));
            assert!(!is_rooted("/abs/path"));
        }
    }

    mod normalize {
        use super::*;

        #[test]
        fn test_relative_gets_prefix() {
            assert_eq!(normalize("main.hlsl"), "./main.hlsl");
            assert_eq!(normalize("inc/a.h"), "./inc/a.h");
            assert_eq!(normalize(""), "./");
            assert_eq!(normalize("../up.h"), "./../up.h");
        }

        #[test]
        fn test_rooted_borrowed() {
            assert!(matches!(normalize("./main.hlsl"), Cow::Borrowed("./main.hlsl")));
            assert!(matches!(normalize("C:\\x.h"), Cow::Borrowed(_)));
        }

        #[test]
        fn test_idempotent() {
            for path in ["", "a", "a/b.h", ".hidden", "..", "C:x", "/abs", "./x", "\\\\s\\x"] {
                let once = normalize(path).into_owned();
                assert!(is_rooted(&once), "{once} should be rooted");
                assert_eq!(normalize(&once), once.as_str());
            }
        }
    }

    mod dir_of {
        use super::*;

        #[test]
        fn test_separator_aligned_prefix() {
            assert!(is_dir_of("./inc", "./inc/foo.h"));
            assert!(is_dir_of("./inc/", "./inc/foo.h"));
            assert!(is_dir_of("./inc", "./inc\\foo.h"));
            assert!(is_dir_of(".", "./foo.h"));
            assert!(is_dir_of("C:\\", "C:\\foo.hlsl"));
        }

        #[test]
        fn test_partial_segment_rejected() {
            assert!(!is_dir_of("./in", "./inc/foo.h"));
            assert!(!is_dir_of("./ba", "./bar.hlsl"));
        }

        #[test]
        fn test_same_or_longer_rejected() {
            assert!(!is_dir_of("./inc/foo.h", "./inc/foo.h"));
            assert!(!is_dir_of("./inc/foo.h/x", "./inc/foo.h"));
            assert!(!is_dir_of("", "./a"));
        }

        #[test]
        fn test_prefix_or_same() {
            assert!(is_dir_prefix_or_same("./inc", "./inc"));
            assert!(is_dir_prefix_or_same("./inc", "./inc/sub"));
            assert!(!is_dir_prefix_or_same("./in", "./inc"));
        }
    }
}
