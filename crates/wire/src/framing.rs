// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Controller-side message framing.
//!
//! Controllers use one of two conventions, detected per message:
//!
//! - header framing: `Content-Length: <N>\r\n`, optional further headers, a
//!   blank line, then exactly N bytes of JSON
//! - line framing: one JSON value per `\n`-terminated line
//!
//! Every reply is written back in the framing of the message it answers.

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::ProtocolError;

/// Largest header-framed body accepted; anything bigger is undecodable.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Header that introduces a length-prefixed message.
pub const CONTENT_LENGTH_PREFIX: &[u8] = b"Content-Length:";

/// Framing convention of a single controller message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// `Content-Length` header block followed by the payload
    ContentLength,
    /// One JSON value per line
    #[default]
    Lines,
}

/// A decoded controller message together with the framing it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub message: Value,
    pub framing: Framing,
}

/// Read the next controller message.
///
/// Returns `None` at end of stream and also when a message cannot be decoded
/// (bad length header, truncated body, invalid JSON). Resynchronising a
/// corrupted stream is not attempted, so callers treat `None` as end of input.
/// Blank lines between line-framed messages are skipped.
pub async fn read_message<R>(reader: &mut R) -> Option<Inbound>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line).await.ok()? == 0 {
            return None;
        }

        if line.starts_with(CONTENT_LENGTH_PREFIX) {
            let message = read_length_prefixed(reader, &line).await?;
            return Some(Inbound { message, framing: Framing::ContentLength });
        }

        let text = std::str::from_utf8(&line).ok()?.trim();
        if text.is_empty() {
            continue;
        }
        let message = serde_json::from_str(text).ok()?;
        return Some(Inbound { message, framing: Framing::Lines });
    }
}

async fn read_length_prefixed<R>(reader: &mut R, header: &[u8]) -> Option<Value>
where
    R: AsyncBufRead + Unpin,
{
    let length: usize =
        std::str::from_utf8(&header[CONTENT_LENGTH_PREFIX.len()..]).ok()?.trim().parse().ok()?;
    if length > MAX_BODY_BYTES {
        return None;
    }

    // Skip any further headers up to and including the blank separator line.
    loop {
        let mut extra = Vec::new();
        let n = reader.read_until(b'\n', &mut extra).await.ok()?;
        if n == 0 || extra == b"\n" || extra == b"\r\n" {
            break;
        }
    }

    let mut body = vec![0u8; length];
    reader.read_exact(&mut body).await.ok()?;
    serde_json::from_slice(&body).ok()
}

/// Encode a message in the given framing.
pub fn encode<T: Serialize>(message: &T, framing: Framing) -> Result<Vec<u8>, ProtocolError> {
    let payload = serde_json::to_vec(message)?;
    Ok(match framing {
        Framing::ContentLength => {
            let mut buf = format!("Content-Length: {}\r\n\r\n", payload.len()).into_bytes();
            buf.extend_from_slice(&payload);
            buf
        }
        Framing::Lines => {
            let mut buf = payload;
            buf.push(b'\n');
            buf
        }
    })
}

/// Write a message in the given framing and flush.
pub async fn write_message<W, T>(
    writer: &mut W,
    message: &T,
    framing: Framing,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let data = encode(message, framing)?;
    writer.write_all(&data).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "framing_tests.rs"]
mod tests;
