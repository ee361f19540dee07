//! Handles returned by path-based calls and their packed word form.
//!
//! A [`Handle`] is either a fixed sentinel (unknown, standard output, standard
//! error, registered output) or a dynamic reference into the included-file list
//! or the search-path list. Handles are plain values: they are never
//! invalidated and the same entity always yields the same handle.
//!
//! The packed form used for descriptors is one 32-bit word:
//!
//! ```text
//!  31..30  29..28  27..26  25..........10  9.........0
//!  unused   kind   unused      length         index
//! ```
//!
//! Sentinels use kind 0 with the sentinel value in the index field, so the
//! unknown handle packs to 0, standard output to 1 and standard error to 2.

use crate::MAX_INCLUDED_FILES;

const INDEX_BITS: u32 = 10;
const LENGTH_BITS: u32 = 16;
const LENGTH_SHIFT: u32 = INDEX_BITS;
const KIND_SHIFT: u32 = 28;
const KIND_BITS: u32 = 2;

const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;
const LENGTH_MASK: u32 = (1 << LENGTH_BITS) - 1;
const KIND_MASK: u32 = (1 << KIND_BITS) - 1;

/// Largest directory prefix length a directory handle can carry.
pub const MAX_DIR_LENGTH: usize = LENGTH_MASK as usize;

const _: () = assert!(MAX_INCLUDED_FILES <= 1 << INDEX_BITS);
const _: () = assert!(LENGTH_SHIFT + LENGTH_BITS <= KIND_SHIFT);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Special = 0,
    File = 1,
    FileDir = 2,
    SearchDir = 3,
}

impl HandleKind {
    fn from_bits(bits: u32) -> HandleKind {
        match bits & KIND_MASK {
            0 => HandleKind::Special,
            1 => HandleKind::File,
            2 => HandleKind::FileDir,
            _ => HandleKind::SearchDir,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SpecialValue {
    Unknown = 0,
    StdOut = 1,
    StdErr = 2,
    Output = 3,
}

impl SpecialValue {
    fn from_index(index: u16) -> Option<SpecialValue> {
        match index {
            0 => Some(SpecialValue::Unknown),
            1 => Some(SpecialValue::StdOut),
            2 => Some(SpecialValue::StdErr),
            3 => Some(SpecialValue::Output),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Handle {
    #[default]
    Unknown,
    StdOut,
    StdErr,
    /// The registered output stream.
    Output,
    /// Entry of the included-file list.
    File(u16),
    /// Directory inferred from the path of an included file.
    FileDir { index: u16, len: u16 },
    /// Directory inferred from a search-path entry.
    SearchDir { index: u16, len: u16 },
}

impl Handle {
    /// Builds a handle from a `(kind, index, length)` triple.
    ///
    /// Returns `None` when the triple cannot be represented: an index wider than
    /// the index field, a non-zero length on a file or sentinel, or an unknown
    /// sentinel value.
    pub fn encode(kind: HandleKind, index: usize, len: usize) -> Option<Handle> {
        if index > INDEX_MASK as usize || len > MAX_DIR_LENGTH {
            return None;
        }
        let (index, len) = (index as u16, len as u16);
        match kind {
            HandleKind::Special if len == 0 => {
                Some(match SpecialValue::from_index(index)? {
                    SpecialValue::Unknown => Handle::Unknown,
                    SpecialValue::StdOut => Handle::StdOut,
                    SpecialValue::StdErr => Handle::StdErr,
                    SpecialValue::Output => Handle::Output,
                })
            }
            HandleKind::File if len == 0 => Some(Handle::File(index)),
            HandleKind::FileDir => Some(Handle::FileDir { index, len }),
            HandleKind::SearchDir => Some(Handle::SearchDir { index, len }),
            _ => None,
        }
    }

    /// Splits a handle into its `(kind, index, length)` triple.
    pub fn decode(self) -> (HandleKind, usize, usize) {
        let (kind, index, len) = match self {
            Handle::Unknown => (HandleKind::Special, SpecialValue::Unknown as u16, 0),
            Handle::StdOut => (HandleKind::Special, SpecialValue::StdOut as u16, 0),
            Handle::StdErr => (HandleKind::Special, SpecialValue::StdErr as u16, 0),
            Handle::Output => (HandleKind::Special, SpecialValue::Output as u16, 0),
            Handle::File(index) => (HandleKind::File, index, 0),
            Handle::FileDir { index, len } => (HandleKind::FileDir, index, len),
            Handle::SearchDir { index, len } => (HandleKind::SearchDir, index, len),
        };
        (kind, index as usize, len as usize)
    }

    /// Packs the handle into its descriptor word.
    pub fn to_raw(self) -> u32 {
        let (kind, index, len) = self.decode();
        ((kind as u32) << KIND_SHIFT) | ((len as u32) << LENGTH_SHIFT) | index as u32
    }

    /// Unpacks a descriptor word. Words with bits outside the layout, or that
    /// denote no valid handle, yield `None`.
    pub fn from_raw(raw: u32) -> Option<Handle> {
        let used = (KIND_MASK << KIND_SHIFT) | (LENGTH_MASK << LENGTH_SHIFT) | INDEX_MASK;
        if raw & !used != 0 {
            return None;
        }
        let kind = HandleKind::from_bits(raw >> KIND_SHIFT);
        let len = ((raw >> LENGTH_SHIFT) & LENGTH_MASK) as usize;
        let index = (raw & INDEX_MASK) as usize;
        Handle::encode(kind, index, len)
    }

    pub fn kind(self) -> HandleKind {
        self.decode().0
    }

    pub fn is_file(self) -> bool {
        matches!(self, Handle::File(_))
    }

    pub fn is_dir(self) -> bool {
        matches!(self, Handle::FileDir { .. } | Handle::SearchDir { .. })
    }

    pub fn is_std_stream(self) -> bool {
        matches!(self, Handle::StdOut | Handle::StdErr)
    }

    pub fn is_unknown(self) -> bool {
        self == Handle::Unknown
    }

    /// Index into the included-file list, for file handles.
    pub fn file_index(self) -> Option<usize> {
        match self {
            Handle::File(index) => Some(index as usize),
            _ => None,
        }
    }

    /// Matched directory prefix length, for directory handles.
    pub fn dir_len(self) -> Option<usize> {
        match self {
            Handle::FileDir { len, .. } | Handle::SearchDir { len, .. } => Some(len as usize),
            _ => None,
        }
    }
}
