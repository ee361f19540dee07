mod args_fs;
mod attributes;
mod descriptor;
mod directory;
mod entry;
mod handle;
mod registry;

pub use args_fs::ArgsFS;
pub use attributes::{FileAttribute, FileInformation, FileStat, FileType};
pub use descriptor::OutputSink;
pub use handle::{Handle, HandleKind, MAX_DIR_LENGTH};
pub use registry::IncludeResolver;

pub(crate) use entry::IncludedFile;
pub(crate) use registry::IncludeRegistry;
