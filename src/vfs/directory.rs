//! Directory emulation over flat name lists.
//!
//! Nothing here stores directories. A path "is a directory" when it is a
//! separator-aligned prefix of a known file name, or equal to / a prefix of a
//! configured search path. Known files are tried before search paths and the
//! first match in list order wins.

use crate::core::utils::{self, is_dir_of, is_dir_prefix_or_same};
use crate::core::{FsError, Result};
use crate::vfs::handle::MAX_DIR_LENGTH;
use crate::vfs::Handle;
use crate::MAX_INCLUDED_FILES;

/// Include search directories, canonicalized and fixed once configured.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    entries: Vec<String>,
}

impl SearchPaths {
    /// Canonicalizes `entries` with [`utils::normalize`].
    ///
    /// Fails with [`FsError::OutOfCapacity`] when more than [`MAX_INCLUDED_FILES`]
    /// entries are supplied.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| utils::normalize(entry.as_ref()).into_owned())
            .collect();
        if entries.len() > MAX_INCLUDED_FILES {
            tracing::warn!(
                count = entries.len(),
                limit = MAX_INCLUDED_FILES,
                "too many include search paths"
            );
            return Err(FsError::OutOfCapacity {
                limit: MAX_INCLUDED_FILES,
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Returns a directory handle if `path` behaves like a directory.
///
/// `files` are the known file names in registry order. The handle records
/// which list matched, the index of the matching entry and the length of
/// `path`.
pub fn find_directory<'a, I>(path: &str, files: I, search: &SearchPaths) -> Option<Handle>
where
    I: IntoIterator<Item = &'a str>,
{
    if path.is_empty() || path.len() > MAX_DIR_LENGTH {
        return None;
    }
    let len = path.len() as u16;

    if let Some(index) = files.into_iter().position(|file| is_dir_of(path, file)) {
        tracing::debug!(path, index, "directory of included file");
        return Some(Handle::FileDir {
            index: index as u16,
            len,
        });
    }

    if let Some(index) = search.iter().position(|entry| is_dir_prefix_or_same(path, entry)) {
        tracing::debug!(path, index, "directory of search path");
        return Some(Handle::SearchDir {
            index: index as u16,
            len,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILES: [&str; 3] = ["./main.hlsl", "./inc/foo.h", "C:\\sdk\\common\\defs.h"];

    #[test]
    fn test_search_paths_canonicalized() {
        let search = SearchPaths::new(["inc", "./shared", "C:\\sdk"]).unwrap();
        let entries: Vec<_> = search.iter().collect();
        assert_eq!(entries, vec!["./inc", "./shared", "C:\\sdk"]);
        assert_eq!(search.len(), 3);
        assert_eq!(search.get(1), Some("./shared"));
        assert!(SearchPaths::default().is_empty());
    }

    #[test]
    fn test_search_paths_bound() {
        let at_limit: Vec<String> = (0..MAX_INCLUDED_FILES).map(|i| format!("dir{i}")).collect();
        assert_eq!(SearchPaths::new(&at_limit).unwrap().len(), MAX_INCLUDED_FILES);

        let over: Vec<String> = (0..=MAX_INCLUDED_FILES).map(|i| format!("dir{i}")).collect();
        assert!(matches!(
            SearchPaths::new(&over),
            Err(FsError::OutOfCapacity { .. })
        ));
    }

    #[test]
    fn test_directory_of_included_file() {
        let search = SearchPaths::default();
        assert_eq!(
            find_directory("./inc", FILES, &search),
            Some(Handle::FileDir { index: 1, len: 5 })
        );
        assert_eq!(
            find_directory("./inc/", FILES, &search),
            Some(Handle::FileDir { index: 1, len: 6 })
        );
        assert_eq!(
            find_directory(".", FILES, &search),
            Some(Handle::FileDir { index: 0, len: 1 })
        );
        assert_eq!(
            find_directory("C:\\sdk", FILES, &search),
            Some(Handle::FileDir { index: 2, len: 6 })
        );
    }

    #[test]
    fn test_no_partial_segment_match() {
        let search = SearchPaths::default();
        assert_eq!(find_directory("./in", FILES, &search), None);
        assert_eq!(find_directory("./main", FILES, &search), None);
        assert_eq!(find_directory("./main.hlsl", FILES, &search), None);
        assert_eq!(find_directory("", FILES, &search), None);
    }

    #[test]
    fn test_search_path_matches() {
        let search = SearchPaths::new(["./shaders/common", "./inc"]).unwrap();
        assert_eq!(
            find_directory("./shaders/common", FILES, &search),
            Some(Handle::SearchDir { index: 0, len: 16 })
        );
        assert_eq!(
            find_directory("./shaders", FILES, &search),
            Some(Handle::SearchDir { index: 0, len: 9 })
        );
        assert_eq!(find_directory("./shader", FILES, &search), None);
    }

    #[test]
    fn test_file_list_wins_over_search_paths() {
        let search = SearchPaths::new(["./inc"]).unwrap();
        assert_eq!(
            find_directory("./inc", FILES, &search),
            Some(Handle::FileDir { index: 1, len: 5 })
        );
    }

    #[test]
    fn test_first_match_in_list_order() {
        let files = ["./a/x.h", "./a/b/y.h"];
        assert_eq!(
            find_directory("./a", files, &SearchPaths::default()),
            Some(Handle::FileDir { index: 0, len: 3 })
        );
    }

    #[test]
    fn test_path_too_long_for_a_handle() {
        let dir = format!("./{}", "d".repeat(MAX_DIR_LENGTH));
        let file = format!("{dir}/main.hlsl");
        assert_eq!(
            find_directory(&dir, [file.as_str()], &SearchPaths::default()),
            None
        );

        let dir = format!("./{}", "d".repeat(MAX_DIR_LENGTH - 2));
        let file = format!("{dir}/main.hlsl");
        assert_eq!(
            find_directory(&dir, [file.as_str()], &SearchPaths::default()),
            Some(Handle::FileDir { index: 0, len: u16::MAX })
        );
    }
}
