use std::io::Cursor;
use std::sync::Arc;

/// A resolved file: canonical name, its bytes and a read cursor over them.
///
/// Opening the same name twice yields the same entry, so every handle to it
/// shares one read position.
#[derive(Debug, Clone)]
pub struct IncludedFile {
    name: String,
    blob: Arc<[u8]>,
    stream: Cursor<Arc<[u8]>>,
}

impl IncludedFile {
    pub fn new<S: Into<String>, B: Into<Arc<[u8]>>>(name: S, blob: B) -> IncludedFile {
        let blob = blob.into();
        IncludedFile {
            name: name.into(),
            stream: Cursor::new(Arc::clone(&blob)),
            blob,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &[u8] {
        &self.blob
    }

    pub fn size(&self) -> u64 {
        self.blob.len() as u64
    }

    pub(crate) fn stream_mut(&mut self) -> &mut Cursor<Arc<[u8]>> {
        &mut self.stream
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Seek, SeekFrom};

    use super::*;

    #[test]
    fn test_new_entry() {
        let mut file = IncludedFile::new("./a.h", b"#pragma once".to_vec());
        assert_eq!(file.name(), "./a.h");
        assert_eq!(file.size(), 12);
        assert_eq!(file.content(), b"#pragma once");
        assert_eq!(file.stream_mut().position(), 0);
    }

    #[test]
    fn test_stream_reads_blob() {
        let mut file = IncludedFile::new("./a.h", &b"abcdef"[..]);
        let mut buf = [0u8; 4];
        file.stream_mut().seek(SeekFrom::Start(2)).unwrap();
        let n = file.stream_mut().read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"cdef");
        assert_eq!(file.content(), b"abcdef");
    }
}
