//! Server List Ping wire format
//!
//! Every packet is `VarInt length | VarInt packet id | body`. A status query
//! is a handshake (next state 1) followed by an empty status request; the
//! server answers with one JSON string.

use crate::error::ProbeError;
use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use warden_core::Metrics;

pub const MAX_FRAME_LEN: usize = 2 * 1024 * 1024;
pub const PROTOCOL_VERSION: i32 = 47;

const MAX_VARINT_BYTES: usize = 5;
const HANDSHAKE_ID: i32 = 0x00;
const STATUS_REQUEST_ID: i32 = 0x00;
const STATUS_RESPONSE_ID: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;

pub type Result<T> = std::result::Result<T, ProbeError>;

pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut rest = value as u32;
    loop {
        if rest & !0x7F == 0 {
            buf.push(rest as u8);
            return;
        }
        buf.push(((rest & 0x7F) | 0x80) as u8);
        rest >>= 7;
    }
}

/// Decodes a VarInt from the front of `buf`, returning it with its length.
pub fn read_varint(buf: &[u8]) -> Result<(i32, usize)> {
    let mut value: u32 = 0;
    for (i, &byte) in buf.iter().take(MAX_VARINT_BYTES).enumerate() {
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value as i32, i + 1));
        }
    }
    if buf.len() >= MAX_VARINT_BYTES {
        Err(ProbeError::VarIntTooLong)
    } else {
        Err(ProbeError::Truncated)
    }
}

async fn read_varint_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32> {
    let mut value: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = reader.read_u8().await?;
        value |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(ProbeError::VarIntTooLong)
}

pub fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_varint(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

pub fn read_string(buf: &[u8]) -> Result<(&str, usize)> {
    let (len, prefix) = read_varint(buf)?;
    let len = usize::try_from(len).map_err(|_| ProbeError::FrameLength(i64::from(len)))?;
    let end = prefix.checked_add(len).ok_or(ProbeError::Truncated)?;
    let bytes = buf.get(prefix..end).ok_or(ProbeError::Truncated)?;
    let text = std::str::from_utf8(bytes).map_err(|_| ProbeError::InvalidUtf8)?;
    Ok((text, end))
}

/// Prefixes `packet_id | body` with its VarInt length.
pub fn frame(packet_id: i32, body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(body.len() + MAX_VARINT_BYTES);
    write_varint(&mut payload, packet_id);
    payload.extend_from_slice(body);

    let mut out = Vec::with_capacity(payload.len() + MAX_VARINT_BYTES);
    write_varint(&mut out, payload.len() as i32);
    out.extend_from_slice(&payload);
    out
}

pub fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::with_capacity(host.len() + 8);
    write_varint(&mut body, PROTOCOL_VERSION);
    write_string(&mut body, host);
    body.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut body, NEXT_STATE_STATUS);
    frame(HANDSHAKE_ID, &body)
}

pub fn status_request_packet() -> Vec<u8> {
    frame(STATUS_REQUEST_ID, &[])
}

pub fn status_response_packet(json: &str) -> Vec<u8> {
    let mut body = Vec::with_capacity(json.len() + MAX_VARINT_BYTES);
    write_string(&mut body, json);
    frame(STATUS_RESPONSE_ID, &body)
}

/// Reads one length-delimited frame and returns `packet_id | body`.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>> {
    let len = read_varint_from(reader).await?;
    let len = usize::try_from(len)
        .ok()
        .filter(|len| *len > 0 && *len <= MAX_FRAME_LEN)
        .ok_or(ProbeError::FrameLength(i64::from(len)))?;
    let mut payload = vec![0; len];
    reader.read_exact(&mut payload).await?;
    Ok(payload)
}

/// JSON document carried by the status response.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub version: Option<VersionInfo>,
    #[serde(default)]
    pub players: Option<PlayerCounts>,
    #[serde(default)]
    pub description: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub name: String,
    #[serde(default)]
    pub protocol: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCounts {
    pub online: u32,
    pub max: u32,
}

impl StatusPayload {
    /// Metrics are only produced when the server reports player counts.
    pub fn into_metrics(self, latency: Duration) -> Option<Metrics> {
        let players = self.players?;
        let motd = self
            .description
            .as_ref()
            .map(flatten_chat)
            .filter(|text| !text.is_empty());
        Some(Metrics {
            online: players.online,
            max: players.max,
            latency_ms: latency.as_secs_f64() * 1000.0,
            version: self.version.map(|v| v.name),
            motd,
        })
    }
}

/// Collapses a chat component (string, `{text, extra}` object or array) to plain text.
fn flatten_chat(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Array(parts) => parts.iter().map(flatten_chat).collect(),
        serde_json::Value::Object(map) => {
            let mut text = map
                .get("text")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string();
            if let Some(extra) = map.get("extra") {
                text.push_str(&flatten_chat(extra));
            }
            text
        }
        _ => String::new(),
    }
}

pub fn decode_status_response(payload: &[u8]) -> Result<StatusPayload> {
    let (packet_id, offset) = read_varint(payload)?;
    if packet_id != STATUS_RESPONSE_ID {
        return Err(ProbeError::UnexpectedPacket(packet_id));
    }
    let rest = payload.get(offset..).ok_or(ProbeError::Truncated)?;
    let (json, _) = read_string(rest)?;
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STATUS_JSON: &str = r#"{
        "version": {"name": "1.21.1", "protocol": 767},
        "players": {"max": 20, "online": 4},
        "description": {"text": "A ", "extra": [{"text": "Minecraft"}, " Server"]}
    }"#;

    #[test]
    fn varint_known_encodings() {
        let cases: [(i32, &[u8]); 5] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (25565, &[0xDD, 0xC7, 0x01]),
            (-1, &[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]),
        ];
        for (value, bytes) in cases {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            assert_eq!(buf, bytes, "encoding {value}");
            assert_eq!(read_varint(bytes).unwrap(), (value, bytes.len()));
        }
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let err = read_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).unwrap_err();
        assert!(matches!(err, ProbeError::VarIntTooLong));
        assert!(matches!(read_varint(&[0x80]), Err(ProbeError::Truncated)));
    }

    #[test]
    fn handshake_layout() {
        let packet = handshake_packet("localhost", 25565);
        let (len, prefix) = read_varint(&packet).unwrap();
        assert_eq!(len as usize, packet.len() - prefix);

        let body = &packet[prefix..];
        assert_eq!(read_varint(body).unwrap(), (HANDSHAKE_ID, 1));
        assert_eq!(read_varint(&body[1..]).unwrap(), (PROTOCOL_VERSION, 1));
        let (host, used) = read_string(&body[2..]).unwrap();
        assert_eq!(host, "localhost");
        let port_at = 2 + used;
        assert_eq!(&body[port_at..port_at + 2], &25565u16.to_be_bytes());
        assert_eq!(body[port_at + 2], NEXT_STATE_STATUS as u8);
    }

    #[tokio::test]
    async fn decodes_status_response_frame() {
        let packet = status_response_packet(STATUS_JSON);
        let mut reader = packet.as_slice();
        let payload = read_frame(&mut reader).await.unwrap();
        let status = decode_status_response(&payload).unwrap();

        let metrics = status.into_metrics(Duration::from_millis(15)).unwrap();
        assert_eq!(metrics.online, 4);
        assert_eq!(metrics.max, 20);
        assert_eq!(metrics.version.as_deref(), Some("1.21.1"));
        assert_eq!(metrics.motd.as_deref(), Some("A Minecraft Server"));
        assert!((metrics.latency_ms - 15.0).abs() < 1e-6);
    }

    #[test]
    fn missing_players_yields_no_metrics() {
        let status: StatusPayload = serde_json::from_str(r#"{"description": "hi"}"#).unwrap();
        assert!(status.into_metrics(Duration::ZERO).is_none());
    }

    #[test]
    fn wrong_packet_id_is_rejected() {
        let mut payload = Vec::new();
        write_varint(&mut payload, 0x01);
        write_string(&mut payload, "{}");
        assert!(matches!(
            decode_status_response(&payload),
            Err(ProbeError::UnexpectedPacket(0x01))
        ));
    }

    #[tokio::test]
    async fn oversized_frame_is_rejected() {
        let mut packet = Vec::new();
        write_varint(&mut packet, (MAX_FRAME_LEN + 1) as i32);
        let mut reader = packet.as_slice();
        assert!(matches!(
            read_frame(&mut reader).await,
            Err(ProbeError::FrameLength(_))
        ));
    }

    proptest! {
        #[test]
        fn varint_decoding_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
            let _ = read_varint(&bytes);
        }

        #[test]
        fn status_decoding_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode_status_response(&bytes);
        }

        #[test]
        fn varint_length_matches_encoding(value in any::<i32>()) {
            let mut buf = Vec::new();
            write_varint(&mut buf, value);
            prop_assert_eq!(read_varint(&buf).unwrap(), (value, buf.len()));
        }
    }
}
