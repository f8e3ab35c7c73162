//! Message framing over stdio.
//!
//! Hosts frame MCP messages in one of two ways: one JSON document per
//! line, or an LSP-style `Content-Length` header block followed by the
//! body. Both are accepted on input, and each response is written with
//! the framing of the request it answers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{McpError, Result};

/// Upper bound on a framed body.
const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// How a message was (or should be) framed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// One JSON document per line.
    Newline,
    /// `Content-Length: N\r\n\r\n` followed by N bytes.
    ContentLength,
}

/// One message read from the stream.
///
/// The body is kept as raw bytes; it is not guaranteed to be UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Raw message bytes.
    pub body: Vec<u8>,
    /// Framing the message arrived in.
    pub framing: Framing,
}

impl Frame {
    /// The body as text.
    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }
}

/// Reads framed messages from a buffered stream.
pub struct MessageReader<R> {
    reader: R,
    line: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> MessageReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
        }
    }

    /// Read the next message, or `None` at end of stream.
    ///
    /// Blank lines between messages are skipped.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                return Ok(None);
            }

            let trimmed = self.line.trim_ascii();
            if trimmed.is_empty() {
                continue;
            }

            if let Ok(text) = std::str::from_utf8(trimmed)
                && is_header_line(text)
            {
                let first = text.to_string();
                let body = self.read_framed_body(&first).await?;
                return Ok(Some(Frame {
                    body,
                    framing: Framing::ContentLength,
                }));
            }

            return Ok(Some(Frame {
                body: trimmed.to_vec(),
                framing: Framing::Newline,
            }));
        }
    }

    /// Finish a header block that began with `first`, then read the body.
    async fn read_framed_body(&mut self, first: &str) -> Result<Vec<u8>> {
        let mut content_length = parse_content_length(first)?;

        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                return Err(McpError::framing("stream ended inside a header block"));
            }
            let header = String::from_utf8_lossy(self.line.trim_ascii());
            if header.is_empty() {
                break;
            }
            if let Some(len) = parse_content_length(&header)? {
                content_length = Some(len);
            }
        }

        let content_length =
            content_length.ok_or_else(|| McpError::framing("missing Content-Length header"))?;
        if content_length > MAX_CONTENT_LENGTH {
            return Err(McpError::framing(format!(
                "Content-Length {} exceeds limit of {} bytes",
                content_length, MAX_CONTENT_LENGTH
            )));
        }

        let mut body = vec![0u8; content_length];
        self.reader.read_exact(&mut body).await?;
        Ok(body)
    }
}

/// A header looks like `Name: value` and never starts a JSON document.
fn is_header_line(line: &str) -> bool {
    if line.starts_with('{') || line.starts_with('[') {
        return false;
    }
    line.split_once(':')
        .is_some_and(|(name, _)| !name.is_empty() && !name.contains(char::is_whitespace))
}

fn parse_content_length(header: &str) -> Result<Option<usize>> {
    let Some((name, value)) = header.split_once(':') else {
        return Ok(None);
    };
    if !name.trim().eq_ignore_ascii_case("content-length") {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e| McpError::framing(format!("invalid Content-Length '{}': {}", value.trim(), e)))
}

/// Write one message with the given framing and flush.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    body: &str,
    framing: Framing,
) -> Result<()> {
    match framing {
        Framing::Newline => {
            writer.write_all(body.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        Framing::ContentLength => {
            let header = format!("Content-Length: {}\r\n\r\n", body.len());
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(body.as_bytes()).await?;
        }
    }
    writer.flush().await?;
    tracing::trace!(bytes = body.len(), ?framing, "sent MCP message");
    Ok(())
}
