//! LSP header framing over arbitrary byte streams.
//!
//! The server connection uses the standard LSP framing protocol:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```
//! The two directions are independent halves so the receive side can block
//! on the server while other threads keep sending: [`FrameReader`] decodes
//! inbound frames and [`FrameWriter`] encodes outbound ones. Both are
//! generic over the underlying stream so the codec can be exercised against
//! in-memory buffers; [`StdioReader`] and [`StdioWriter`] are the concrete
//! halves over a child process's stdio.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{ChildStdin, ChildStdout};

use crate::error::TransportError;

/// Inbound half of a transport over a spawned server process's stdout.
pub type StdioReader = FrameReader<BufReader<ChildStdout>>;

/// Outbound half of a transport over a spawned server process's stdin.
pub type StdioWriter = FrameWriter<BufWriter<ChildStdin>>;

/// Creates the transport halves from child process handles.
#[must_use]
pub fn from_child_io(stdout: ChildStdout, stdin: ChildStdin) -> (StdioReader, StdioWriter) {
    (
        FrameReader::new(BufReader::new(stdout)),
        FrameWriter::new(BufWriter::new(stdin)),
    )
}

/// Decodes LSP-framed messages from a byte stream.
pub struct FrameReader<R> {
    reader: R,
}

impl<R> FrameReader<R>
where
    R: BufRead,
{
    /// Creates a reader over an arbitrary buffered stream.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Receives one framed message, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::MissingContentLength`] when the header
    /// block carries no `Content-Length`, [`TransportError::InvalidHeader`]
    /// for an unparseable length, and [`TransportError::Io`] for stream
    /// failures (including EOF).
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Reads the header block and extracts the Content-Length value.
    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length: Option<usize> = None;

        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line)?;
            if bytes_read == 0 {
                return Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Empty line marks end of headers
                break;
            }

            if let Some(length) = parse_content_length(trimmed)? {
                content_length = Some(length);
            }
            // Other headers (e.g. Content-Type) are ignored
        }

        content_length.ok_or(TransportError::MissingContentLength)
    }
}

/// Encodes LSP-framed messages onto a byte stream.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W> FrameWriter<W>
where
    W: Write,
{
    /// Creates a writer over an arbitrary stream.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Sends one framed message.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] when writing to the stream fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let header = format!("Content-Length: {}\r\n\r\n", message.len());
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Parses a `Content-Length` header line, ignoring other headers.
fn parse_content_length(header_line: &str) -> Result<Option<usize>, TransportError> {
    match header_line.strip_prefix("Content-Length: ") {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| TransportError::InvalidHeader),
        None => Ok(None),
    }
}
