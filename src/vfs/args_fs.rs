//! This module provides the file system a compiler frontend runs against when
//! all of its inputs arrive as API arguments instead of files on disk.
//!
//! ### Key Features:
//! - **Primary source**: the buffer being compiled is always file 0 under its canonical name.
//! - **Lazy includes**: other names are fetched once through an [`IncludeResolver`] and cached.
//! - **Directory emulation**: directories are inferred from known file names and search paths.
//! - **Captured streams**: standard output/error are buffered in memory; one named output may
//!   be routed to a caller-supplied sink.
//! - **Deterministic refusal**: mutation, enumeration, links and mapping always fail with
//!   [`FsError::NotCapable`].

use std::io::{SeekFrom, Write};

use crate::core::{FsError, HostFs, Result, utils};
use crate::vfs::descriptor::{self, Descriptors, OutputSink};
use crate::vfs::directory::{self, SearchPaths};
use crate::vfs::{
    FileAttribute, FileInformation, FileStat, FileType, Handle, IncludeRegistry, IncludeResolver,
    IncludedFile,
};

const CONSOLE_COLUMNS: u32 = 80;

/// A virtual file system over one in-memory source buffer and an optional include resolver.
///
/// ### Internal state
///
/// * `files` — included-file registry. Entry 0 is the primary source under its canonical
///   name; further entries are appended as the resolver supplies them and never removed.
/// * `search` — include search directories, set once by [`ArgsFS::set_search_paths`].
/// * `descriptors` — buffered standard streams and the registered output sink.
///
/// ### Name resolution
///
/// Every path is first canonicalized with [`utils::normalize`]. Then, in order:
/// 1. the primary source name (exact match);
/// 2. the registered output name (exact match);
/// 3. directory emulation over known file names and search paths;
/// 4. the registry, which may call the resolver.
///
/// ### Thread Safety
///
/// This struct is **not thread‑safe**. Registry growth and lazy stream creation are
/// check‑then‑act sequences; wrap the instance in a `Mutex` if it must be shared.
///
/// ### Example
///
/// ```
/// use args_vfs::{ArgsFS, Handle, HostFs};
///
/// let mut fs = ArgsFS::with_resolver("main.hlsl", b"#include \"inc/a.h\"".to_vec(), |path: &str| {
///     Ok((path == "./inc/a.h").then(|| b"float a;".to_vec()))
/// });
///
/// assert_eq!(fs.open("./main.hlsl").unwrap(), Handle::File(0));
/// assert_eq!(fs.open("inc/a.h").unwrap(), Handle::File(1));
/// assert!(fs.query_attributes("./inc").unwrap().is_dir());
/// assert!(fs.open("./missing.h").unwrap_err().is_not_found());
/// ```
#[derive(Debug)]
pub struct ArgsFS {
    files: IncludeRegistry,
    search: SearchPaths,
    search_configured: bool,
    descriptors: Descriptors,
    display_include_process: bool,
}

impl ArgsFS {
    /// Creates a file system holding only `source` under `source_name`.
    /// Any other name is not found.
    pub fn new<B: Into<Vec<u8>>>(source_name: &str, source: B) -> Self {
        Self::build(source_name, source.into(), None)
    }

    /// Creates a file system that loads unknown names through `resolver`.
    pub fn with_resolver<B, F>(source_name: &str, source: B, resolver: F) -> Self
    where
        B: Into<Vec<u8>>,
        F: FnMut(&str) -> anyhow::Result<Option<Vec<u8>>> + 'static,
    {
        Self::build(source_name, source.into(), Some(Box::new(resolver)))
    }

    /// Same as [`ArgsFS::with_resolver`] for resolvers that are not closures.
    pub fn with_include_resolver<B, R>(source_name: &str, source: B, resolver: R) -> Self
    where
        B: Into<Vec<u8>>,
        R: IncludeResolver + 'static,
    {
        Self::build(source_name, source.into(), Some(Box::new(resolver)))
    }

    fn build(source_name: &str, source: Vec<u8>, resolver: Option<Box<dyn IncludeResolver>>) -> Self {
        let source_name = utils::normalize(source_name).into_owned();
        tracing::debug!(source = %source_name, size = source.len(), "created args file system");
        Self {
            files: IncludeRegistry::new(IncludedFile::new(source_name, source), resolver),
            search: SearchPaths::default(),
            search_configured: false,
            descriptors: Descriptors::new(),
            display_include_process: false,
        }
    }

    /// Canonical name of the primary source.
    pub fn source_name(&self) -> &str {
        self.files.source().name()
    }

    /// Names of all known files in load order; the primary source first.
    pub fn included_files(&self) -> impl Iterator<Item = &str> {
        self.files.names()
    }

    /// Content of a file handle.
    pub fn file_content(&self, handle: Handle) -> Option<&[u8]> {
        handle
            .file_index()
            .and_then(|index| self.files.get(index))
            .map(IncludedFile::content)
    }

    /// Canonical include search directories, in configuration order.
    pub fn search_paths(&self) -> impl Iterator<Item = &str> {
        self.search.iter()
    }

    /// Writes `Opening file [...]` lines to standard error whenever the resolver loads a file.
    pub fn enable_display_include_process(&mut self) {
        self.display_include_process = true;
    }

    /// Installs the include search directories.
    ///
    /// Relative entries are pinned under `./`. More than
    /// [`MAX_INCLUDED_FILES`](crate::MAX_INCLUDED_FILES) entries fail with
    /// [`FsError::OutOfCapacity`]; the host cannot proceed without them.
    ///
    /// # Panics
    /// If search paths were already configured.
    pub fn set_search_paths<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        assert!(!self.search_configured, "search paths configured twice");
        self.search = SearchPaths::new(entries)?;
        self.search_configured = true;
        Ok(())
    }

    /// Routes the file named `name` to `sink`.
    ///
    /// # Panics
    /// If an output stream is already registered.
    pub fn register_output_stream<S: OutputSink + 'static>(&mut self, name: &str, sink: S) {
        let name = utils::normalize(name).into_owned();
        tracing::debug!(output = %name, "registered output stream");
        self.descriptors.register_output(name, Box::new(sink));
    }

    pub fn std_streams_created(&self) -> bool {
        self.descriptors.std_streams_created()
    }

    /// Returns and clears everything written to standard output.
    pub fn take_stdout(&mut self) -> Vec<u8> {
        self.descriptors.take_stdout()
    }

    /// Returns and clears everything written to standard error.
    /// A second call without intervening writes returns an empty buffer.
    pub fn take_stderr(&mut self) -> Vec<u8> {
        self.descriptors.take_stderr()
    }

    /// Drains standard error into `out`.
    pub fn write_stderr_to<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        out.write_all(&self.descriptors.take_stderr())?;
        out.flush()
    }

    fn is_output_name(&self, path: &str) -> bool {
        self.descriptors.output_name() == Some(path)
    }

    /// Whether `handle` denotes an entity this instance has issued.
    fn is_live(&self, handle: Handle) -> bool {
        match handle {
            Handle::Unknown => false,
            Handle::StdOut | Handle::StdErr => true,
            Handle::Output => self.descriptors.output_name().is_some(),
            Handle::File(index) | Handle::FileDir { index, .. } => {
                (index as usize) < self.files.len()
            }
            Handle::SearchDir { index, .. } => (index as usize) < self.search.len(),
        }
    }

    fn find_directory(&self, path: &str) -> Option<Handle> {
        directory::find_directory(path, self.files.names(), &self.search)
    }

    fn find_or_open(&mut self, path: &str) -> Result<usize> {
        let resolved = self.files.resolve(path)?;
        if resolved.loaded && self.display_include_process {
            let line = format!(
                "Opening file [{}], stack top [{}]\n",
                path,
                resolved.index as isize - 1
            );
            self.descriptors.stderr().write_all(line.as_bytes())?;
        }
        Ok(resolved.index)
    }

    fn output_size(&mut self) -> Result<u64> {
        match self.descriptors.output_len() {
            Some(len) => Ok(len?),
            None => Err(FsError::InvalidHandle(Handle::Output)),
        }
    }
}

impl HostFs for ArgsFS {
    /// Resolves `path` to a handle: output sentinel, primary source, directory, or
    /// included file.
    fn open(&mut self, path: &str) -> Result<Handle> {
        tracing::trace!(path, "open");
        let path = utils::normalize(path);

        if self.is_output_name(&path) {
            return Ok(Handle::Output);
        }
        if path == self.source_name() {
            return Ok(Handle::File(0));
        }
        if let Some(dir) = self.find_directory(&path) {
            return Ok(dir);
        }
        let index = self.find_or_open(&path)?;
        Ok(Handle::File(index as u16))
    }

    /// Same resolution order as [`HostFs::open`], answering attributes and size.
    fn query_attributes(&mut self, path: &str) -> Result<FileStat> {
        tracing::trace!(path, "query attributes");
        let path = utils::normalize(path);

        if path == self.source_name() {
            return Ok(FileStat::file(self.files.source().size()));
        }
        if self.is_output_name(&path) {
            return Ok(FileStat::file(self.output_size()?));
        }
        if self.find_directory(&path).is_some() {
            return Ok(FileStat::directory());
        }
        let index = self.find_or_open(&path)?;
        let size = self.files.get(index).map_or(0, IncludedFile::size);
        Ok(FileStat::file(size))
    }

    fn find_first(&mut self, _pattern: &str) -> Result<Handle> {
        Err(FsError::NotCapable("find_first"))
    }

    fn find_next(&mut self, _find: Handle) -> Result<String> {
        Err(FsError::NotCapable("find_next"))
    }

    fn find_close(&mut self, _find: Handle) -> Result<()> {
        Err(FsError::NotCapable("find_close"))
    }

    fn file_information(&mut self, handle: Handle) -> Result<FileInformation> {
        let stat = match handle {
            Handle::File(index) => {
                let file = self
                    .files
                    .get(index as usize)
                    .ok_or(FsError::InvalidHandle(handle))?;
                FileStat::file(file.size())
            }
            Handle::Output => FileStat::file(self.output_size()?),
            Handle::FileDir { .. } | Handle::SearchDir { .. } if self.is_live(handle) => {
                FileStat::directory()
            }
            _ => return Err(FsError::InvalidHandle(handle)),
        };
        Ok(FileInformation {
            stat,
            index_low: handle.to_raw(),
            index_high: u32::from(stat.attribute() == FileAttribute::Directory),
        })
    }

    fn file_type(&self, handle: Handle) -> Result<FileType> {
        if handle.is_std_stream() {
            return Ok(FileType::Char);
        }
        if !self.is_live(handle) {
            return Err(FsError::NotFound(format!("{handle:?}")));
        }
        Ok(FileType::Disk)
    }

    /// Handles are never released; closing an issued handle only succeeds.
    fn close_handle(&mut self, handle: Handle) -> Result<()> {
        if !self.is_live(handle) {
            return Err(FsError::InvalidHandle(handle));
        }
        Ok(())
    }

    fn read_file(&mut self, _handle: Handle, _buf: &mut [u8]) -> Result<usize> {
        Err(FsError::NotCapable("read_file"))
    }

    fn delete_file(&mut self, _path: &str) -> Result<()> {
        Err(FsError::NotCapable("delete_file"))
    }

    fn move_file(&mut self, _from: &str, _to: &str) -> Result<()> {
        Err(FsError::NotCapable("move_file"))
    }

    fn create_directory(&mut self, _path: &str) -> Result<()> {
        Err(FsError::NotCapable("create_directory"))
    }

    fn remove_directory(&mut self, _path: &str) -> Result<()> {
        Err(FsError::NotCapable("remove_directory"))
    }

    fn create_hard_link(&mut self, _link: &str, _existing: &str) -> Result<()> {
        Err(FsError::NotCapable("create_hard_link"))
    }

    fn create_symbolic_link(&mut self, _link: &str, _target: &str) -> Result<()> {
        Err(FsError::NotCapable("create_symbolic_link"))
    }

    fn supports_symbolic_links(&self) -> bool {
        false
    }

    fn set_file_time(&mut self, _handle: Handle) -> Result<()> {
        Err(FsError::NotCapable("set_file_time"))
    }

    fn resize_file(&mut self, _path: &str, _size: u64) -> Result<()> {
        Err(FsError::NotCapable("resize_file"))
    }

    fn create_file_mapping(&mut self, _handle: Handle) -> Result<Handle> {
        Err(FsError::NotCapable("create_file_mapping"))
    }

    fn map_view_of_file(&mut self, _mapping: Handle) -> Result<&[u8]> {
        Err(FsError::NotCapable("map_view_of_file"))
    }

    fn unmap_view_of_file(&mut self, _view: &[u8]) -> Result<()> {
        Err(FsError::NotCapable("unmap_view_of_file"))
    }

    fn current_directory(&self) -> Result<String> {
        Err(FsError::NotCapable("current_directory"))
    }

    fn main_module_file_name(&self) -> Result<String> {
        Err(FsError::NotCapable("main_module_file_name"))
    }

    fn temp_path(&self) -> Result<String> {
        Err(FsError::NotCapable("temp_path"))
    }

    fn fd_is_displayed(&self, _fd: i32) -> bool {
        false
    }

    fn column_count(&self) -> u32 {
        CONSOLE_COLUMNS
    }

    fn console_text_attributes(&self) -> u32 {
        0
    }

    fn set_console_text_attributes(&mut self, _attributes: u32) -> Result<()> {
        Err(FsError::NotCapable("set_console_text_attributes"))
    }

    fn reset_console_text_attributes(&mut self) -> Result<()> {
        Err(FsError::NotCapable("reset_console_text_attributes"))
    }

    fn open_os_handle(&self, handle: Handle) -> i32 {
        descriptor::fd_from_handle(handle)
    }

    fn get_os_handle(&self, fd: i32) -> Result<Handle> {
        descriptor::handle_from_fd(fd).ok_or(FsError::BadDescriptor(fd))
    }

    fn close_fd(&mut self, _fd: i32) -> Result<()> {
        Ok(())
    }

    fn set_mode(&mut self, _fd: i32, _mode: i32) -> Result<()> {
        Ok(())
    }

    fn read(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize> {
        self.descriptors.read(fd, buf, &mut self.files)
    }

    fn write(&mut self, fd: i32, buf: &[u8]) -> Result<usize> {
        self.descriptors.write(fd, buf, &mut self.files)
    }

    fn lseek(&mut self, fd: i32, pos: SeekFrom) -> Result<u64> {
        self.descriptors.seek(fd, pos, &mut self.files)
    }
}
