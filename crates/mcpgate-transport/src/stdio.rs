//! Newline-delimited message channel.
//!
//! Each message is one line of JSON. Blank lines are skipped on read and
//! every write is followed by a flush, so a peer blocked on a read sees the
//! message immediately.
//!
//! # Example
//!
//! ```rust
//! use mcpgate_transport::stdio::LineTransport;
//!
//! # async fn example() -> Result<(), mcpgate_transport::TransportError> {
//! let input: &[u8] = b"\n{\"jsonrpc\":\"2.0\",\"method\":\"ping\",\"id\":1}\n";
//! let mut transport = LineTransport::new(input, Vec::new());
//!
//! let line = transport.recv_line().await?;
//! assert!(line.is_some());
//! assert!(transport.recv_line().await?.is_none());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::TransportError;

/// Maximum message size (16 MB).
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// A line-oriented transport over any async reader/writer pair.
pub struct LineTransport<R, W> {
    reader: BufReader<R>,
    writer: W,
    max_message_size: usize,
}

/// A line transport bound to the process's stdin and stdout.
pub type StdioTransport = LineTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    /// Create a transport over the process's stdin and stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a transport over custom streams.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            max_message_size: MAX_MESSAGE_SIZE,
        }
    }

    /// Override the maximum accepted line length.
    #[must_use]
    pub const fn with_max_message_size(mut self, max: usize) -> Self {
        self.max_message_size = max;
        self
    }

    /// Read the next non-blank line, without its terminator.
    ///
    /// Returns `Ok(None)` at end of input. Oversized and non-UTF-8 lines are
    /// consumed and reported as recoverable errors.
    pub async fn recv_line(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            let mut buf = Vec::new();
            let read = self.reader.read_until(b'\n', &mut buf).await?;
            if read == 0 {
                return Ok(None);
            }

            if buf.len() > self.max_message_size {
                tracing::warn!(size = buf.len(), max = self.max_message_size, "discarding oversized line");
                return Err(TransportError::MessageTooLarge {
                    size: buf.len(),
                    max: self.max_message_size,
                });
            }

            let line = String::from_utf8(buf)
                .map_err(|e| TransportError::invalid_message(format!("line is not UTF-8: {e}")))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(trimmed.to_string()));
        }
    }

    /// Write one line and flush.
    pub async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        if line.len() > self.max_message_size {
            return Err(TransportError::MessageTooLarge {
                size: line.len(),
                max: self.max_message_size,
            });
        }
        if line.contains('\n') {
            return Err(TransportError::invalid_message(
                "outbound message contains a newline",
            ));
        }

        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Serialize a value as compact JSON and write it as one line.
    pub async fn send_value<T: Serialize>(&mut self, value: &T) -> Result<(), TransportError> {
        let json = serde_json::to_string(value)?;
        self.send_line(&json).await
    }

    /// Flush pending output.
    pub async fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Take back the writer half.
    pub fn into_writer(self) -> W {
        self.writer
    }
}
