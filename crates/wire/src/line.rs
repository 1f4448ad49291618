// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-delimited JSON codec for the executor wire.
//!
//! Wire format: one JSON object followed by `\n`, in both directions.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::ProtocolError;

/// Serialize a message into a single newline-terminated frame.
pub fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = serde_json::to_vec(msg)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Deserialize one frame (with or without its trailing newline).
pub fn decode<T: DeserializeOwned>(frame: &str) -> Result<T, ProtocolError> {
    Ok(serde_json::from_str(frame.trim_end_matches(['\r', '\n']))?)
}

/// Read one frame. End of stream is reported as [`ProtocolError::ConnectionClosed`].
pub async fn read_frame<R>(reader: &mut R) -> Result<String, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(ProtocolError::ConnectionClosed);
    }
    Ok(line)
}

/// Read one frame, giving up after `timeout` of inactivity.
pub async fn read_frame_timeout<R>(reader: &mut R, timeout: Duration) -> Result<String, ProtocolError>
where
    R: AsyncBufRead + Unpin,
{
    tokio::time::timeout(timeout, read_frame(reader)).await.map_err(|_| ProtocolError::Timeout)?
}

/// Read and decode one message.
pub async fn read_message<R, T>(reader: &mut R) -> Result<T, ProtocolError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let frame = read_frame(reader).await?;
    decode(&frame)
}

/// Encode and write one message, flushing afterwards.
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let data = encode(msg)?;
    writer.write_all(&data).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
#[path = "line_tests.rs"]
mod tests;
