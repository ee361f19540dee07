//! A virtual file system for compilers whose inputs arrive as API arguments.
//!
//! ### Overview
//!
//! `args-vfs` presents a handle-based file API (open, stat, read, seek, close) to a host
//! compiler frontend while touching no real storage. The backing data is one in-memory
//! primary source plus files loaded on demand through a caller-supplied resolver. Output
//! goes to buffered standard streams and, optionally, to one registered sink.
//!
//! **Key ideas**:
//! - **Stable handles**: a handle is a small `Copy` value that always denotes the same entity.
//! - **Canonical names**: relative names are pinned under `./`, so the same file is always
//!   found under the same name.
//! - **Bounded registry**: at most [`MAX_INCLUDED_FILES`] files and search paths; lookups are
//!   linear scans.
//! - **Emulated directories**: a name is a directory when it prefixes a known file or search
//!   path on a separator boundary.
//! - **Explicit refusal**: everything the model cannot express fails with
//!   [`FsError::NotCapable`].

mod core;
mod vfs;

pub use crate::core::{FsError, HostFs, Result, utils};
pub use crate::vfs::{
    ArgsFS, FileAttribute, FileInformation, FileStat, FileType, Handle, HandleKind,
    IncludeResolver, MAX_DIR_LENGTH, OutputSink,
};

/// Maximum number of included files, and of include search paths.
pub const MAX_INCLUDED_FILES: usize = 1000;
