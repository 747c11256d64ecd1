use std::{
    fs::File,
    io::{Read, Seek, SeekFrom},
    path::Path,
};

use tracing::{debug, info};

use crate::{
    error::{Result, UploadError},
    plan::UploadDescriptor,
    query::{QueryParams, add_query_params},
    transport::{ProbeResult, Transport},
};

/// Receives the human-facing messages of an upload run.
pub trait Reporter {
    fn report_progress(&self, message: &str);
    fn report_result(&self, result: &str);
    fn report_error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The last chunk was uploaded; holds the server's response to it.
    Completed { result: String },
    /// Every chunk was already on the server, so nothing was sent.
    AlreadyComplete,
    /// Some chunks were sent, but the server already held the last one, so no result came back.
    Finished { uploaded_chunks: u64 },
}

pub struct UploadSession<'a, T, R> {
    transport: &'a T,
    reporter: &'a R,
    chunk_size: u64,
}

impl<'a, T: Transport, R: Reporter> UploadSession<'a, T, R> {
    pub fn new(transport: &'a T, reporter: &'a R, chunk_size: u64) -> Self {
        Self {
            transport,
            reporter,
            chunk_size,
        }
    }

    /// Uploads `path` to `url`, one chunk at a time, skipping chunks the server already holds.
    pub async fn run(&self, url: &str, path: &Path) -> Result<UploadOutcome> {
        if !path.is_file() {
            return Err(UploadError::FileNotFound(path.to_path_buf()));
        }

        let mut file = File::open(path)?;
        let total_size = file.metadata()?.len();
        let file_name = path
            .file_name()
            .ok_or_else(|| UploadError::FileNotFound(path.to_path_buf()))?
            .to_str()
            .ok_or_else(|| UploadError::InvalidFileName(path.to_path_buf()))?
            .to_string();

        let descriptor = UploadDescriptor::new(total_size, &file_name, self.chunk_size);
        info!(
            identifier = %descriptor.resumable_identifier,
            token = %descriptor.upload_token,
            chunks = descriptor.total_chunks,
            "starting upload"
        );

        self.upload_chunks(url, &descriptor, &mut file).await
    }

    async fn upload_chunks<F: Read + Seek>(
        &self,
        url: &str,
        descriptor: &UploadDescriptor,
        file: &mut F,
    ) -> Result<UploadOutcome> {
        let total = descriptor.total_chunks;
        let mut uploaded_chunks = 0;

        for index in 1..=total {
            let probe_url = add_query_params(url, &probe_params(descriptor, index));

            match self.transport.probe_chunk(&probe_url).await? {
                ProbeResult::Exists => {
                    self.reporter
                        .report_progress(&format!("[{}/{}] Chunk exists!", index, total));
                }
                ProbeResult::Missing => {
                    let data = read_chunk(file, descriptor, index)?;
                    let size = data.len();
                    let upload_url = add_query_params(url, &upload_params(descriptor, index));

                    let response = self
                        .transport
                        .upload_chunk(&upload_url, &descriptor.file_name, data)
                        .await?;
                    uploaded_chunks += 1;

                    self.reporter.report_progress(&format!(
                        "[{}/{}] Uploaded chunk of size {} bytes",
                        index, total, size
                    ));

                    if descriptor.is_last(index) {
                        self.reporter.report_result(&response);
                        return Ok(UploadOutcome::Completed { result: response });
                    }
                }
            }
        }

        if uploaded_chunks == 0 {
            self.reporter
                .report_progress("All chunks already present on the server, nothing to upload");
            return Ok(UploadOutcome::AlreadyComplete);
        }

        self.reporter.report_progress(&format!(
            "Uploaded {} of {} chunks, the server already held the rest",
            uploaded_chunks, total
        ));
        Ok(UploadOutcome::Finished { uploaded_chunks })
    }
}

fn probe_params(descriptor: &UploadDescriptor, index: u64) -> QueryParams {
    QueryParams::new()
        .with("resumableChunkNumber", index)
        .with("resumableFilename", &descriptor.file_name)
        .with("uploadToken", &descriptor.upload_token)
}

fn upload_params(descriptor: &UploadDescriptor, index: u64) -> QueryParams {
    QueryParams::new()
        .with("resumableChunkNumber", index)
        .with("resumableFilename", &descriptor.file_name)
        .with("resumableChunkSize", descriptor.chunk_size)
        .with("resumableTotalSize", descriptor.total_size)
        .with("resumableIdentifier", &descriptor.resumable_identifier)
        .with("resumableTotalChunks", descriptor.total_chunks)
        .with("uploadToken", &descriptor.upload_token)
}

/// Reads the bytes of chunk `index`, positioning the cursor at the chunk's own offset so that
/// chunks skipped earlier in the run never shift the data.
fn read_chunk<F: Read + Seek>(
    file: &mut F,
    descriptor: &UploadDescriptor,
    index: u64,
) -> Result<Vec<u8>> {
    let range = descriptor.chunk_range(index);
    file.seek(SeekFrom::Start(range.start))?;

    let mut data = Vec::with_capacity((range.end - range.start) as usize);
    file.by_ref()
        .take(descriptor.chunk_size)
        .read_to_end(&mut data)?;

    debug!(index, offset = range.start, bytes = data.len(), "read chunk");
    Ok(data)
}
