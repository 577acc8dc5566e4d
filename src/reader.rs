use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, BufReader};
use tracing::{debug, info, warn};

/// Configuration for input reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Whether to fail fast on first error or continue with the remaining inputs
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
    /// Reject inputs larger than this many bytes
    pub max_bytes: Option<u64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            buffer_size: 8192,
            max_bytes: None,
        }
    }
}

/// Statistics for one read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub source: String,
    pub bytes_read: u64,
    pub chars_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

impl ReadStats {
    fn failed(source: String, error: String) -> Self {
        Self {
            source,
            bytes_read: 0,
            chars_read: 0,
            duration_ms: 0,
            read_error: Some(error),
        }
    }
}

/// Async reader that loads whole text values, byte-exact
///
/// Line endings are kept as-is: match offsets index the text exactly as read.
pub struct AsyncInputReader {
    config: ReaderConfig,
}

impl AsyncInputReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a whole UTF-8 file
    pub async fn read_file<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        debug!("Starting async read of file: {}", path.display());

        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        self.read_source(file, path.display().to_string()).await
    }

    /// Read all of standard input
    pub async fn read_stdin(&self) -> Result<(String, ReadStats)> {
        self.read_source(tokio::io::stdin(), "<stdin>".to_string()).await
    }

    /// Read several files in order; without fail_fast a failed file yields empty text plus its error
    pub async fn read_files_batch<P: AsRef<Path>>(&self, file_paths: &[P]) -> Result<Vec<(String, ReadStats)>> {
        info!("Starting batch read of {} files", file_paths.len());

        let mut results = Vec::with_capacity(file_paths.len());

        for file_path in file_paths {
            match self.read_file(file_path).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    if self.config.fail_fast {
                        return Err(e);
                    }
                    warn!("Failed to read file {}: {:#}", file_path.as_ref().display(), e);
                    let source = file_path.as_ref().display().to_string();
                    results.push((String::new(), ReadStats::failed(source, format!("{e:#}"))));
                }
            }
        }

        info!("Completed batch read of {} files", results.len());
        Ok(results)
    }

    async fn read_source<R: AsyncRead + Unpin>(&self, source: R, name: String) -> Result<(String, ReadStats)> {
        let start_time = std::time::Instant::now();
        let mut reader = BufReader::with_capacity(self.config.buffer_size, source);

        let mut bytes = Vec::new();
        match self.config.max_bytes {
            Some(limit) => {
                // One extra byte tells "exactly at the limit" from "over it"
                reader.take(limit.saturating_add(1)).read_to_end(&mut bytes).await?;
                if bytes.len() as u64 > limit {
                    anyhow::bail!("Input {} exceeds the {} byte limit", name, limit);
                }
            }
            None => {
                reader.read_to_end(&mut bytes).await?;
            }
        }

        let text = String::from_utf8(bytes).with_context(|| format!("Input {name} is not valid UTF-8"))?;

        let stats = ReadStats {
            source: name,
            bytes_read: text.len() as u64,
            chars_read: text.chars().count() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Successfully read {}: {} bytes, {} chars in {}ms",
            stats.source, stats.bytes_read, stats.chars_read, stats.duration_ms
        );
        Ok((text, stats))
    }
}

/// Convenience function for reading a single file with default configuration
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = AsyncInputReader::new(ReaderConfig::default());
    let (text, _stats) = reader.read_file(file_path).await?;
    Ok(text)
}
