//! Descriptor and handle multiplexing onto backing streams.
//!
//! ### Mapping
//! - Descriptor `1` and [`Handle::StdOut`] → buffered standard output.
//! - Descriptor `2` and [`Handle::StdErr`] → buffered standard error.
//! - [`Handle::Output`] → the registered output sink.
//! - [`Handle::File`] → the read cursor of that included file.
//!
//! Any other descriptor is the packed word of a handle ([`Handle::to_raw`]).
//! Descriptors that decode to no handle, or to a handle with no stream
//! (unknown, directories), fail with [`FsError::BadDescriptor`].
//!
//! The standard streams are plain in-memory buffers, created on first use and
//! never connected to a console. Callers drain them when the host is done.

use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

use crate::core::{FsError, Result};
use crate::vfs::{Handle, IncludeRegistry};

pub const STDOUT_FILENO: i32 = 1;
pub const STDERR_FILENO: i32 = 2;

/// Destination registered for the compiler's output file.
pub trait OutputSink: Write + Seek {}

impl<T: Write + Seek> OutputSink for T {}

/// Current length of `sink`, leaving its position unchanged.
pub fn sink_len(sink: &mut dyn OutputSink) -> io::Result<u64> {
    let pos = sink.stream_position()?;
    let len = sink.seek(SeekFrom::End(0))?;
    if pos != len {
        sink.seek(SeekFrom::Start(pos))?;
    }
    Ok(len)
}

/// Maps a descriptor onto the handle it stands for.
pub fn handle_from_fd(fd: i32) -> Option<Handle> {
    match fd {
        STDOUT_FILENO => Some(Handle::StdOut),
        STDERR_FILENO => Some(Handle::StdErr),
        fd if fd > 0 => Handle::from_raw(fd as u32),
        _ => None,
    }
}

/// Maps a handle onto its descriptor.
pub fn fd_from_handle(handle: Handle) -> i32 {
    match handle {
        Handle::StdOut => STDOUT_FILENO,
        Handle::StdErr => STDERR_FILENO,
        other => other.to_raw() as i32,
    }
}

/// The stream one descriptor resolves to.
enum Backing<'a> {
    Output(&'a mut dyn OutputSink),
    Memory(&'a mut Cursor<Vec<u8>>),
    File(&'a mut Cursor<Arc<[u8]>>),
}

impl Backing<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Backing::Output(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "output stream is write-only",
            )),
            Backing::Memory(cursor) => cursor.read(buf),
            Backing::File(cursor) => cursor.read(buf),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Backing::Output(sink) => sink.write(buf),
            Backing::Memory(cursor) => cursor.write(buf),
            Backing::File(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "included files are read-only",
            )),
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Backing::Output(sink) => sink.seek(pos),
            Backing::Memory(cursor) => cursor.seek(pos),
            Backing::File(cursor) => cursor.seek(pos),
        }
    }
}

struct OutputRegistration {
    name: String,
    sink: Box<dyn OutputSink>,
}

/// Owner of the standard streams and the registered output.
#[derive(Default)]
pub(crate) struct Descriptors {
    stdout: Option<Cursor<Vec<u8>>>,
    stderr: Option<Cursor<Vec<u8>>>,
    output: Option<OutputRegistration>,
}

impl Descriptors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn std_streams_created(&self) -> bool {
        self.stdout.is_some() && self.stderr.is_some()
    }

    pub fn stdout(&mut self) -> &mut Cursor<Vec<u8>> {
        self.stdout.get_or_insert_with(Cursor::default)
    }

    pub fn stderr(&mut self) -> &mut Cursor<Vec<u8>> {
        self.stderr.get_or_insert_with(Cursor::default)
    }

    /// Returns everything written to standard output and empties the buffer.
    pub fn take_stdout(&mut self) -> Vec<u8> {
        drain(&mut self.stdout)
    }

    /// Returns everything written to standard error and empties the buffer.
    pub fn take_stderr(&mut self) -> Vec<u8> {
        drain(&mut self.stderr)
    }

    /// Registers `sink` as the stream behind the already canonical `name`.
    ///
    /// # Panics
    /// If an output is already registered.
    pub fn register_output(&mut self, name: String, sink: Box<dyn OutputSink>) {
        assert!(self.output.is_none(), "output stream registered twice");
        self.output = Some(OutputRegistration { name, sink });
    }

    pub fn output_name(&self) -> Option<&str> {
        self.output.as_ref().map(|output| output.name.as_str())
    }

    /// Current size of the registered output.
    pub fn output_len(&mut self) -> Option<io::Result<u64>> {
        self.output
            .as_mut()
            .map(|output| sink_len(output.sink.as_mut()))
    }

    fn backing<'a>(
        &'a mut self,
        handle: Handle,
        files: &'a mut IncludeRegistry,
    ) -> Option<Backing<'a>> {
        match handle {
            Handle::Output => self
                .output
                .as_mut()
                .map(|output| Backing::Output(output.sink.as_mut())),
            Handle::StdOut => Some(Backing::Memory(self.stdout())),
            Handle::StdErr => Some(Backing::Memory(self.stderr())),
            Handle::File(index) => files
                .get_mut(index as usize)
                .map(|file| Backing::File(file.stream_mut())),
            _ => None,
        }
    }

    fn backing_for_fd<'a>(
        &'a mut self,
        fd: i32,
        files: &'a mut IncludeRegistry,
    ) -> Result<Backing<'a>> {
        handle_from_fd(fd)
            .and_then(|handle| self.backing(handle, files))
            .ok_or(FsError::BadDescriptor(fd))
    }

    pub fn read(&mut self, fd: i32, buf: &mut [u8], files: &mut IncludeRegistry) -> Result<usize> {
        let mut backing = self.backing_for_fd(fd, files)?;
        Ok(backing.read(buf)?)
    }

    pub fn write(&mut self, fd: i32, buf: &[u8], files: &mut IncludeRegistry) -> Result<usize> {
        if fd == STDERR_FILENO {
            tracing::trace!(target: "args_vfs::stderr", "{}", String::from_utf8_lossy(buf));
        }
        let mut backing = self.backing_for_fd(fd, files)?;
        Ok(backing.write(buf)?)
    }

    pub fn seek(&mut self, fd: i32, pos: SeekFrom, files: &mut IncludeRegistry) -> Result<u64> {
        let mut backing = self.backing_for_fd(fd, files)?;
        Ok(backing.seek(pos)?)
    }
}

fn drain(stream: &mut Option<Cursor<Vec<u8>>>) -> Vec<u8> {
    match stream {
        Some(cursor) => {
            let bytes = std::mem::take(cursor.get_mut());
            cursor.set_position(0);
            bytes
        }
        None => Vec::new(),
    }
}

impl fmt::Debug for Descriptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptors")
            .field("stdout", &self.stdout.as_ref().map(|c| c.get_ref().len()))
            .field("stderr", &self.stderr.as_ref().map(|c| c.get_ref().len()))
            .field("output", &self.output_name())
            .finish()
    }
}
