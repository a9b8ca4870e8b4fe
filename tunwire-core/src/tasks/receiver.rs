//! UDP read → decrypt → header check → reassembler → TUN/TAP write
//! (spec.md §4.4). Also owns peer-address learning in server mode.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncWriteExt, WriteHalf};
use tokio::net::UdpSocket;
use tokio_tun::Tun;
use tracing::warn;

use crate::error::{Result, TunnelError};
use crate::peer::PeerTx;
use crate::reassembly::{Outcome, Reassembler};
use crate::timers::Timers;
use crate::wire::{align_up, FrameCipher, Header, HEADER_LEN, ID_LEN, IO_BUF_LEN};

pub async fn run(
    socket: Arc<UdpSocket>,
    mut tun_write: WriteHalf<Tun>,
    cipher: Arc<FrameCipher>,
    timers: Timers,
    peer_tx: Option<PeerTx>,
) -> Result<()> {
    let mut reassembler = Reassembler::new();
    let mut last_peer: Option<SocketAddr> = None;
    let mut buf = vec![0u8; IO_BUF_LEN];

    loop {
        let (n, src) = match &peer_tx {
            // Connected socket (client mode): source is always the configured peer.
            None if socket.peer_addr().is_ok() => {
                let n = socket.recv(&mut buf).await.map_err(TunnelError::Io)?;
                (n, socket.peer_addr().unwrap())
            }
            _ => socket.recv_from(&mut buf).await.map_err(TunnelError::Io)?,
        };

        if n < HEADER_LEN + ID_LEN {
            warn!(n, "too short");
            continue;
        }
        if n % cipher.block_size() != 0 {
            warn!(n, "bad block multiple");
            continue;
        }

        cipher.decrypt(&mut buf[..n]);
        let h = Header::decode(&buf[..n]);

        let expected = align_up(HEADER_LEN + h.len as usize);
        if n != expected {
            warn!(n, expected, "bad packet size");
            continue;
        }

        if h.is_hello() {
            let id_bytes = h.id.to_le_bytes();
            if h.len as usize != ID_LEN || buf[HEADER_LEN..HEADER_LEN + ID_LEN] != id_bytes[..] {
                warn!("bad hello");
                continue;
            }
            timers.mark_recv();
            learn_peer(&peer_tx, &mut last_peer, src);
            continue;
        }

        if h.frag_n >= h.frag_num {
            warn!(frag_n = h.frag_n, frag_num = h.frag_num, "bad header");
            continue;
        }

        let payload = &buf[HEADER_LEN..HEADER_LEN + h.len as usize];

        let complete: Option<Vec<u8>> = if h.frag_num == 1 {
            Some(payload.to_vec())
        } else {
            match reassembler.accept(h.id, h.frag_n, h.frag_num, payload) {
                Outcome::Complete(p) => Some(p),
                Outcome::Pending => None,
                Outcome::HeaderMismatch => None,
            }
        };

        timers.mark_recv();
        learn_peer(&peer_tx, &mut last_peer, src);

        if let Some(p) = complete {
            match tun_write.write_all(&p).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => {
                    warn!(%e, "invalid IP datagram");
                }
                Err(e) => return Err(TunnelError::Io(e)),
            }
        }
    }
}

fn learn_peer(peer_tx: &Option<PeerTx>, last_peer: &mut Option<SocketAddr>, src: SocketAddr) {
    let Some(tx) = peer_tx else { return };
    if *last_peer != Some(src) {
        *last_peer = Some(src);
        tx.publish(src);
    }
}
