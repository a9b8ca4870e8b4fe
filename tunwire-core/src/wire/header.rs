//! Fixed 12-byte frame header: `Id: u64, FragN: u8, FragNum: u8, Len: u16`, all
//! little-endian. `FragNum == 0` marks a hello/keep-alive frame.

/// Wire size of the header in bytes.
pub const HEADER_LEN: usize = 12;

/// Byte length of the `Id` field, also the payload length of a hello frame.
pub const ID_LEN: usize = 8;

/// Scratch buffer size used for a single TUN/TAP read or UDP datagram.
pub const IO_BUF_LEN: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub id: u64,
    pub frag_n: u8,
    pub frag_num: u8,
    pub len: u16,
}

impl Header {
    pub fn is_hello(&self) -> bool {
        self.frag_num == 0
    }

    /// Writes the header fields little-endian into `buf[0..HEADER_LEN]`.
    ///
    /// `buf` shorter than `HEADER_LEN` is a programming error, not a runtime
    /// condition the caller can recover from.
    pub fn encode(&self, buf: &mut [u8]) {
        assert!(buf.len() >= HEADER_LEN, "header buffer too short");
        buf[0..8].copy_from_slice(&self.id.to_le_bytes());
        buf[8] = self.frag_n;
        buf[9] = self.frag_num;
        buf[10..12].copy_from_slice(&self.len.to_le_bytes());
    }

    pub fn decode(buf: &[u8]) -> Header {
        assert!(buf.len() >= HEADER_LEN, "header buffer too short");
        let id = u64::from_le_bytes(buf[0..8].try_into().unwrap());
        let frag_n = buf[8];
        let frag_num = buf[9];
        let len = u16::from_le_bytes(buf[10..12].try_into().unwrap());
        Header { id, frag_n, frag_num, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_fields() {
        let h = Header { id: 0x0102_0304_0506_0708, frag_n: 3, frag_num: 7, len: 1300 };
        let mut buf = [0u8; HEADER_LEN];
        h.encode(&mut buf);
        assert_eq!(Header::decode(&buf), h);
    }

    #[test]
    fn encodes_little_endian() {
        let h = Header { id: 1, frag_n: 0, frag_num: 0, len: ID_LEN as u16 };
        let mut buf = [0u8; HEADER_LEN];
        h.encode(&mut buf);
        assert_eq!(&buf[0..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&buf[10..12], &(ID_LEN as u16).to_le_bytes());
    }

    #[test]
    fn hello_frame_has_frag_num_zero() {
        let h = Header { id: 9, frag_n: 0, frag_num: 0, len: 8 };
        assert!(h.is_hello());
        let not_hello = Header { id: 9, frag_n: 0, frag_num: 1, len: 8 };
        assert!(!not_hello.is_hello());
    }

    #[test]
    #[should_panic]
    fn encode_panics_on_short_buffer() {
        let h = Header { id: 0, frag_n: 0, frag_num: 0, len: 0 };
        let mut buf = [0u8; HEADER_LEN - 1];
        h.encode(&mut buf);
    }
}
