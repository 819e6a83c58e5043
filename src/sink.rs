use async_trait::async_trait;
use std::error::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

/// Asynchronous destination for rendered log blocks.
///
/// The pipeline hands every block to `send` in input order and awaits it
/// before reading the next line, so implementations never see blocks out
/// of order.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Write a single rendered block.
    ///
    /// **Parameters**
    /// - `block`: styled text produced by the renderer, already terminated
    ///   by a newline.
    ///
    /// **Returns**
    /// - `Ok(())` if the block was accepted.
    /// - `Err(..)` if the destination failed. The pipeline stops on the
    ///   first sink error.
    async fn send(&self, block: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Flush anything buffered by the destination.
    ///
    /// Default implementation is a no-op.
    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

/// [`OutputSink`] writing to any async writer, typically
/// [`tokio::io::stdout`].
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> OutputSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&self, block: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.lock().await.write_all(block.as_bytes()).await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writer.lock().await.flush().await?;
        Ok(())
    }
}
