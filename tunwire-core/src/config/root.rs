use serde::Deserialize;
use std::net::SocketAddr;

/// Virtual interface kind.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Tun,
    Tap,
}

/// Main configuration structure.
///
/// Parsed from JSON with shell-style `#` comment lines; see
/// [`super::loader::load_from_path`]. Not validated on its own — pass
/// through [`super::loader::validate_config`] first.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Interface name. Must be shorter than `IFNAMSIZ` (16 bytes including
    /// the kernel's terminating NUL).
    pub dev: String,
    /// TUN (IP datagrams) or TAP (Ethernet frames).
    pub mode: Mode,
    /// Bind address. Optional; if absent the OS picks an ephemeral port.
    #[serde(default)]
    pub local: Option<SocketAddr>,
    /// Peer address. Absent puts the daemon in server mode: the peer is
    /// learned from the source address of inbound datagrams instead.
    #[serde(default)]
    pub remote: Option<SocketAddr>,
    /// Maximum fragment payload size in bytes, before block alignment.
    pub max_pay: usize,
    /// Symmetric key, hex-encoded in the file; decodes to 16, 24, or 32
    /// raw bytes (AES-128/192/256).
    #[serde(deserialize_with = "deserialize_hex_key")]
    pub key: Vec<u8>,
    /// Keep-alive idle interval in seconds; `0` disables the hello task.
    #[serde(default)]
    pub hello_secs: u64,
    /// "Remote is down" logging idle interval in seconds; `0` disables the
    /// liveness monitor.
    #[serde(default)]
    pub log_down_secs: u64,
}

fn deserialize_hex_key<'de, D>(d: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    hex::decode(s.trim()).map_err(serde::de::Error::custom)
}
