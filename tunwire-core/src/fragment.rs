//! Splits one TUN/TAP read into equal-sized fragments, each tagged with its
//! own header, encrypted independently, ready for a UDP write.

use tracing::warn;

use crate::wire::{align_up, FrameCipher, Header, HEADER_LEN};

/// `FragNum` is a `u8` with `0` reserved for hello frames, so one original
/// packet can use at most this many fragments.
pub const MAX_FRAGMENTS: usize = 255;

/// One outbound fragment: an encrypted, block-aligned datagram ready to send.
pub struct Fragment {
    pub frag_n: u8,
    pub bytes: Vec<u8>,
}

/// Splits the `n` bytes of plaintext payload at `src[0..n]` into
/// `ceil(n / max_pay)` fragments sharing `id`, encrypting each with `cipher`.
///
/// Mirrors spec.md §4.3: an equal division of `n` across `FragNum`
/// fragments (`payLen = ceil(n / FragNum)`, the last fragment carries the
/// remainder), rather than `max_pay`-sized fragments followed by a short
/// tail. `FragNum` must fit in `u8` (max `MAX_FRAGMENTS` fragments per
/// packet); `validate_config` rejects `max_pay` values that could ever
/// need more, but an oversized read is dropped here too rather than
/// panicking the data plane.
pub fn fragment(id: u64, src: &[u8], max_pay: usize, cipher: &FrameCipher) -> Vec<Fragment> {
    let n = src.len();
    assert!(n > 0, "fragment() called with an empty packet");
    let frag_num = n.div_ceil(max_pay);
    if frag_num == 0 || frag_num > MAX_FRAGMENTS {
        warn!(n, max_pay, frag_num, "packet needs too many fragments, dropping");
        return Vec::new();
    }
    let frag_num = frag_num as u8;
    let pay_len = n.div_ceil(frag_num as usize);

    let mut out = Vec::with_capacity(frag_num as usize);
    let mut offset = 0usize;
    for frag_n in 0..frag_num {
        let this_len = std::cmp::min(pay_len, n - offset);
        let header = Header { id, frag_n, frag_num, len: this_len as u16 };

        let pkt_len = align_up(HEADER_LEN + this_len);
        let mut window = vec![0u8; pkt_len];
        header.encode(&mut window[0..HEADER_LEN]);
        window[HEADER_LEN..HEADER_LEN + this_len]
            .copy_from_slice(&src[offset..offset + this_len]);
        // Bytes in [HEADER_LEN + this_len, pkt_len) are left as zero padding;
        // the original design leaves over scratch-buffer bytes here instead
        // (see DESIGN.md), but zeroing does not affect interop since the
        // receiver discards padding based on `h.len`, not its content.
        cipher.encrypt(&mut window);

        out.push(Fragment { frag_n, bytes: window });
        offset += this_len;
    }
    out
}
