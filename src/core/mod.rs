mod error;
pub mod utils;

use std::io::SeekFrom;

pub use error::FsError;

use crate::vfs::{FileInformation, FileStat, FileType, Handle};

pub type Result<T> = std::result::Result<T, FsError>;

/// The file-API surface a host compiler frontend drives.
///
/// Path-based calls resolve a name to a [`Handle`]; descriptor-based calls move
/// bytes through the stream behind a descriptor. Operations the backing model
/// cannot express fail with [`FsError::NotCapable`] instead of being emulated.
pub trait HostFs {
    // Path-based queries.
    fn open(&mut self, path: &str) -> Result<Handle>;
    fn query_attributes(&mut self, path: &str) -> Result<FileStat>;
    fn find_first(&mut self, pattern: &str) -> Result<Handle>;
    fn find_next(&mut self, find: Handle) -> Result<String>;
    fn find_close(&mut self, find: Handle) -> Result<()>;

    // Handle-based queries.
    fn file_information(&mut self, handle: Handle) -> Result<FileInformation>;
    fn file_type(&self, handle: Handle) -> Result<FileType>;
    fn close_handle(&mut self, handle: Handle) -> Result<()>;
    fn read_file(&mut self, handle: Handle, buf: &mut [u8]) -> Result<usize>;

    // Mutation, links, mapping and environment.
    fn delete_file(&mut self, path: &str) -> Result<()>;
    fn move_file(&mut self, from: &str, to: &str) -> Result<()>;
    fn create_directory(&mut self, path: &str) -> Result<()>;
    fn remove_directory(&mut self, path: &str) -> Result<()>;
    fn create_hard_link(&mut self, link: &str, existing: &str) -> Result<()>;
    fn create_symbolic_link(&mut self, link: &str, target: &str) -> Result<()>;
    fn supports_symbolic_links(&self) -> bool;
    fn set_file_time(&mut self, handle: Handle) -> Result<()>;
    fn resize_file(&mut self, path: &str, size: u64) -> Result<()>;
    fn create_file_mapping(&mut self, handle: Handle) -> Result<Handle>;
    fn map_view_of_file(&mut self, mapping: Handle) -> Result<&[u8]>;
    fn unmap_view_of_file(&mut self, view: &[u8]) -> Result<()>;
    fn current_directory(&self) -> Result<String>;
    fn main_module_file_name(&self) -> Result<String>;
    fn temp_path(&self) -> Result<String>;

    // Console.
    fn fd_is_displayed(&self, fd: i32) -> bool;
    fn column_count(&self) -> u32;
    fn console_text_attributes(&self) -> u32;
    fn set_console_text_attributes(&mut self, attributes: u32) -> Result<()>;
    fn reset_console_text_attributes(&mut self) -> Result<()>;

    // Descriptors.
    fn open_os_handle(&self, handle: Handle) -> i32;
    fn get_os_handle(&self, fd: i32) -> Result<Handle>;
    fn close_fd(&mut self, fd: i32) -> Result<()>;
    fn set_mode(&mut self, fd: i32, mode: i32) -> Result<()>;
    fn read(&mut self, fd: i32, buf: &mut [u8]) -> Result<usize>;
    fn write(&mut self, fd: i32, buf: &[u8]) -> Result<usize>;
    fn lseek(&mut self, fd: i32, pos: SeekFrom) -> Result<u64>;
}
