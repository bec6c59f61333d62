//! Message framing for token arrays.
//!
//! A frame is a 2-byte big-endian payload length followed by the payload:
//! every token, each terminated by a NUL byte. Tokens therefore must not
//! contain NUL, and a frame carries at most 65535 payload bytes.

use crate::error::{ChannelError, OptionsError};
use crate::options::SpawnOptions;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum payload size of one frame.
pub const MAX_FRAME_SIZE: usize = u16::MAX as usize;

/// Size of the length header.
pub const HEADER_SIZE: usize = 2;

/// Encode `tokens` into a complete frame, header included.
///
/// # Errors
///
/// - `NulInToken` if a token contains a NUL byte
/// - `FrameTooLarge` if the payload exceeds [`MAX_FRAME_SIZE`]
pub fn encode_frame<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u8>, ChannelError> {
    let size: usize = tokens.iter().map(|t| t.as_ref().len() + 1).sum();
    if size > MAX_FRAME_SIZE {
        return Err(ChannelError::FrameTooLarge {
            size,
            max: MAX_FRAME_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(HEADER_SIZE + size);
    frame.extend_from_slice(&(size as u16).to_be_bytes());

    for (index, token) in tokens.iter().enumerate() {
        let bytes = token.as_ref().as_bytes();
        if bytes.contains(&0) {
            return Err(ChannelError::NulInToken { index });
        }
        frame.extend_from_slice(bytes);
        frame.push(0);
    }

    Ok(frame)
}

/// Decode a frame payload (without its header) into tokens.
///
/// # Errors
///
/// - `Unterminated` if a non-empty payload does not end with NUL
/// - `InvalidUtf8` if the payload is not UTF-8
pub fn decode_frame(payload: &[u8]) -> Result<Vec<String>, ChannelError> {
    if payload.is_empty() {
        return Ok(Vec::new());
    }

    let body = payload
        .strip_suffix(b"\0")
        .ok_or(ChannelError::Unterminated)?;
    let text = std::str::from_utf8(body).map_err(|_| ChannelError::InvalidUtf8)?;

    Ok(text.split('\0').map(str::to_string).collect())
}

/// Frames token arrays over an async byte stream.
#[derive(Debug)]
pub struct MessageChannel<S> {
    stream: S,
}

impl<S> MessageChannel<S> {
    /// Wrap a stream.
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Get the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: AsyncWrite + Unpin> MessageChannel<S> {
    /// Write one token array as a frame and flush.
    pub async fn write_array<T: AsRef<str>>(
        &mut self,
        tokens: &[T],
    ) -> Result<(), ChannelError> {
        let frame = encode_frame(tokens)?;
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;

        tracing::trace!(tokens = tokens.len(), bytes = frame.len(), "Wrote array");
        Ok(())
    }

    /// Validate `options` and send them after a leading `command` token.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Violation` without writing anything if the
    /// options are invalid, or `OptionsError::Channel` if the write fails.
    pub async fn write_options(
        &mut self,
        command: &str,
        options: &SpawnOptions,
    ) -> Result<(), OptionsError> {
        options.validate()?;

        let mut tokens = vec![command.to_string()];
        options.append_to(&mut tokens);
        self.write_array(&tokens).await?;
        Ok(())
    }
}

impl<S: AsyncRead + Unpin> MessageChannel<S> {
    /// Read one token array.
    ///
    /// Returns `Ok(None)` if the stream ends cleanly before a new frame.
    pub async fn read_array(&mut self) -> Result<Option<Vec<String>>, ChannelError> {
        let mut header = [0u8; HEADER_SIZE];

        if self.stream.read(&mut header[..1]).await? == 0 {
            return Ok(None);
        }
        self.read_exact(&mut header[1..]).await?;

        let size = usize::from(u16::from_be_bytes(header));
        let mut payload = vec![0u8; size];
        self.read_exact(&mut payload).await?;

        let tokens = decode_frame(&payload)?;
        tracing::trace!(tokens = tokens.len(), bytes = size, "Read array");
        Ok(Some(tokens))
    }

    /// Read a command token followed by spawn options.
    ///
    /// Returns `Ok(None)` on clean end of stream. The decoded options are
    /// validated before they are returned.
    pub async fn read_options(
        &mut self,
    ) -> Result<Option<(String, SpawnOptions)>, OptionsError> {
        let Some(mut tokens) = self.read_array().await? else {
            return Ok(None);
        };
        if tokens.is_empty() {
            return Err(ChannelError::MissingCommand.into());
        }

        let options = SpawnOptions::from_tokens(&tokens, 1)?;
        options.validate()?;

        let command = tokens.swap_remove(0);
        Ok(Some((command, options)))
    }

    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ChannelError> {
        match self.stream.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(ChannelError::UnexpectedEof)
            }
            Err(e) => Err(ChannelError::Io(e)),
        }
    }
}
