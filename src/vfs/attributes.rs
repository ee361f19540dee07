#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileAttribute {
    Normal,
    Directory,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FileType {
    /// Character device; the standard streams.
    Char,
    Disk,
}

/// Result of a path-based attribute query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FileStat {
    attribute: FileAttribute,
    size: u64,
}

impl FileStat {
    pub fn new(attribute: FileAttribute, size: u64) -> FileStat {
        FileStat { attribute, size }
    }

    pub fn file(size: u64) -> FileStat {
        FileStat::new(FileAttribute::Normal, size)
    }

    pub fn directory() -> FileStat {
        FileStat::new(FileAttribute::Directory, 0)
    }

    pub fn attribute(&self) -> FileAttribute {
        self.attribute
    }

    /// Byte size for files, 0 for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_file(&self) -> bool {
        self.attribute == FileAttribute::Normal
    }

    pub fn is_dir(&self) -> bool {
        self.attribute == FileAttribute::Directory
    }
}

/// Result of a handle-based information query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FileInformation {
    pub stat: FileStat,
    /// Packed handle word; unique per entity.
    pub index_low: u32,
    /// 1 for directories, 0 otherwise.
    pub index_high: u32,
}
