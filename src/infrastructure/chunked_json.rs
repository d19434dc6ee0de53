// Chunked JSON streaming utilities
use crate::infrastructure::http_response::brotli_compress;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Serialize;

pub const FRAME_CONTENT_TYPE: &str = "application/x-ndframe+json";

/// Create a chunked streaming response, one length-prefixed frame per message
pub async fn chunked_json_stream<S, T>(
    stream: S,
    compress: bool,
) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = T> + Send + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let byte_stream = stream.then(move |msg| async move { encode_frame(&msg, compress).await });

    let body = Body::from_stream(byte_stream);

    // Frames are compressed one by one, so the response itself carries no
    // Content-Encoding; clients would otherwise try to inflate the framing.
    // No Content-Length either, hyper falls back to chunked transfer.
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, FRAME_CONTENT_TYPE)
        .header("x-frame-encoding", if compress { "br" } else { "identity" })
        .body(body)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Encode one message as `u32` big-endian length followed by the payload
pub async fn encode_frame<T: Serialize>(msg: &T, compress: bool) -> Result<Bytes, std::io::Error> {
    // 1. Serialize to JSON
    let json = serde_json::to_vec(msg).map_err(std::io::Error::other)?;

    // 2. Optionally compress
    let payload = if compress {
        brotli_compress(&json).await?
    } else {
        json
    };

    // 3. Prepend length
    let length = payload.len() as u32;
    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(length);
    chunk.put_slice(&payload);

    Ok(chunk.freeze())
}

/// Split a buffer of concatenated frames back into payloads
#[cfg(test)]
pub fn decode_frames(mut buffer: &[u8]) -> Option<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    while !buffer.is_empty() {
        if buffer.len() < 4 {
            return None;
        }
        let (len_bytes, rest) = buffer.split_at(4);
        let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        if rest.len() < len {
            return None;
        }
        frames.push(rest[..len].to_vec());
        buffer = &rest[len..];
    }
    Some(frames)
}

/// Helper to create a streaming response from a receiver
pub async fn stream_from_receiver<T>(
    mut rx: tokio::sync::mpsc::Receiver<T>,
    compress: bool,
) -> impl IntoResponse
where
    T: Serialize + Send + Sync + 'static,
{
    let stream = async_stream::stream! {
        while let Some(msg) = rx.recv().await {
            yield msg;
        }
    };

    match chunked_json_stream(stream, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_compression::tokio::bufread::BrotliDecoder;
    use serde_json::{json, Value};
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn test_frame_layout() {
        let frame = encode_frame(&json!({ "type": "logged_out" }), false).await.unwrap();
        let payload = br#"{"type":"logged_out"}"#;

        assert_eq!(&frame[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&frame[4..], payload);
    }

    #[tokio::test]
    async fn test_compressed_frame() {
        let message = json!({ "type": "complete", "widgets": 7 });
        let frame = encode_frame(&message, true).await.unwrap();
        let frames = decode_frames(&frame).unwrap();

        let mut decoder = BrotliDecoder::new(&frames[0][..]);
        let mut raw = Vec::new();
        decoder.read_to_end(&mut raw).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&raw).unwrap(), message);
    }

    #[tokio::test]
    async fn test_stream_body() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        tx.send(json!({ "n": 1 })).await.unwrap();
        tx.send(json!({ "n": 2 })).await.unwrap();
        drop(tx);

        let response = stream_from_receiver(rx, false).await.into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], FRAME_CONTENT_TYPE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let frames = decode_frames(&body).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(serde_json::from_slice::<Value>(&frames[1]).unwrap(), json!({ "n": 2 }));
    }

    #[test]
    fn test_truncated_buffer() {
        assert_eq!(decode_frames(&[0, 0, 0, 5, b'a']), None);
        assert_eq!(decode_frames(&[0, 0]), None);
        assert_eq!(decode_frames(&[]), Some(vec![]));
    }
}
