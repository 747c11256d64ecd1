use std::ops::Range;

use uuid::Uuid;

const MEGABYTE: u64 = 1024 * 1024; // 1MB
pub const DEFAULT_CHUNK_SIZE_BYTES: u64 = 5 * MEGABYTE;

/// Number of chunk attempts for a file of `total_size` bytes.
///
/// This is always one more than the number of whole chunks, so a file whose size is an exact
/// multiple of `chunk_size` ends with an empty trailing chunk. Servers speaking this protocol
/// validate the chunk count against the same formula.
pub fn total_chunks(total_size: u64, chunk_size: u64) -> u64 {
    total_size / chunk_size + 1
}

/// Everything that identifies one upload run to the server.
#[derive(Clone, Debug)]
pub struct UploadDescriptor {
    pub total_size: u64,
    pub file_name: String,
    pub resumable_identifier: String,
    pub chunk_size: u64,
    pub total_chunks: u64,
    pub upload_token: String,
}

impl UploadDescriptor {
    pub fn new(total_size: u64, file_name: &str, chunk_size: u64) -> Self {
        Self::with_token(total_size, file_name, chunk_size, Uuid::new_v4().to_string())
    }

    pub fn with_token(
        total_size: u64,
        file_name: &str,
        chunk_size: u64,
        upload_token: String,
    ) -> Self {
        Self {
            total_size,
            file_name: file_name.to_string(),
            resumable_identifier: format!("{}-{}", total_size, file_name),
            chunk_size,
            total_chunks: total_chunks(total_size, chunk_size),
            upload_token,
        }
    }

    /// Byte range of the 1-based chunk `index`, clamped to the end of the file.
    pub fn chunk_range(&self, index: u64) -> Range<u64> {
        let start = (index - 1)
            .saturating_mul(self.chunk_size)
            .min(self.total_size);
        let end = index.saturating_mul(self.chunk_size).min(self.total_size);
        start..end
    }

    pub fn is_last(&self, index: u64) -> bool {
        index == self.total_chunks
    }
}
