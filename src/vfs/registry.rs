//! Bounded, append-only list of resolved files.
//!
//! Entry 0 is always the primary source. Further entries are appended when the
//! include resolver supplies bytes for a name that is not yet known. Lookups are
//! linear scans over at most [`MAX_INCLUDED_FILES`] names.

use std::fmt;

use crate::core::{FsError, Result};
use crate::vfs::IncludedFile;
use crate::MAX_INCLUDED_FILES;

/// Supplies the bytes of files that are not the primary source.
///
/// `Ok(None)` means there is no such file; `Err` means the resolver itself failed.
pub trait IncludeResolver {
    fn load_source(&mut self, path: &str) -> anyhow::Result<Option<Vec<u8>>>;
}

impl<F> IncludeResolver for F
where
    F: FnMut(&str) -> anyhow::Result<Option<Vec<u8>>>,
{
    fn load_source(&mut self, path: &str) -> anyhow::Result<Option<Vec<u8>>> {
        self(path)
    }
}

/// Outcome of [`IncludeRegistry::resolve`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub index: usize,
    /// `true` when this call invoked the resolver and appended the entry.
    pub loaded: bool,
}

pub(crate) struct IncludeRegistry {
    files: Vec<IncludedFile>,
    resolver: Option<Box<dyn IncludeResolver>>,
}

impl IncludeRegistry {
    /// Creates a registry holding only the primary source.
    pub fn new(source: IncludedFile, resolver: Option<Box<dyn IncludeResolver>>) -> Self {
        Self {
            files: vec![source],
            resolver,
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    pub fn get(&self, index: usize) -> Option<&IncludedFile> {
        self.files.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut IncludedFile> {
        self.files.get_mut(index)
    }

    pub fn source(&self) -> &IncludedFile {
        &self.files[0]
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(IncludedFile::name)
    }

    /// Index of the entry named exactly `path`.
    pub fn find(&self, path: &str) -> Option<usize> {
        self.files.iter().position(|file| file.name() == path)
    }

    /// Finds `path` among known entries, or loads it through the resolver.
    ///
    /// # Errors
    /// * [`FsError::NotFound`] - unknown name and no resolver, or the resolver has no such file.
    /// * [`FsError::OutOfCapacity`] - unknown name and the registry is full.
    /// * [`FsError::ResolverFailed`] - the resolver returned an error.
    pub fn resolve(&mut self, path: &str) -> Result<Resolved> {
        if let Some(index) = self.find(path) {
            return Ok(Resolved {
                index,
                loaded: false,
            });
        }

        let Some(resolver) = self.resolver.as_mut() else {
            return Err(FsError::NotFound(path.to_string()));
        };

        if self.files.len() >= MAX_INCLUDED_FILES {
            tracing::warn!(path, limit = MAX_INCLUDED_FILES, "included file limit reached");
            return Err(FsError::OutOfCapacity {
                limit: MAX_INCLUDED_FILES,
            });
        }

        let blob = resolver
            .load_source(path)
            .map_err(|source| FsError::ResolverFailed {
                path: path.to_string(),
                source,
            })?
            .ok_or_else(|| FsError::NotFound(path.to_string()))?;

        tracing::debug!(path, size = blob.len(), "loaded include");
        self.files.push(IncludedFile::new(path, blob));
        Ok(Resolved {
            index: self.files.len() - 1,
            loaded: true,
        })
    }
}

impl fmt::Debug for IncludeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeRegistry")
            .field("files", &self.names().collect::<Vec<_>>())
            .field("has_resolver", &self.has_resolver())
            .finish()
    }
}
