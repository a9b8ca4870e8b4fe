//! Idle-triggered keep-alive (spec.md §4.6). Disabled entirely when
//! `hello_secs == 0`.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::warn;

use crate::error::{Result, TunnelError};
use crate::id::IdGen;
use crate::tasks::{is_recoverable_send_error, HelloTarget};
use crate::timers::Timers;
use crate::wire::{align_up, FrameCipher, Header, HEADER_LEN, ID_LEN};

pub async fn run(
    socket: Arc<UdpSocket>,
    cipher: Arc<FrameCipher>,
    timers: Timers,
    mut target: HelloTarget,
    hello_interval: Duration,
) -> Result<()> {
    let mut ids = IdGen::new();

    loop {
        let idle = timers.since_sent();
        let wait = hello_interval.saturating_sub(idle);

        if wait.is_zero() {
            let id = ids.next();
            let header = Header { id, frag_n: 0, frag_num: 0, len: ID_LEN as u16 };

            let pkt_len = align_up(HEADER_LEN + ID_LEN);
            let mut buf = vec![0u8; pkt_len];
            header.encode(&mut buf[0..HEADER_LEN]);
            buf[HEADER_LEN..HEADER_LEN + ID_LEN].copy_from_slice(&id.to_le_bytes());
            cipher.encrypt(&mut buf);

            if let Some(addr) = target.resolve() {
                let outcome = if target.is_connected() {
                    socket.send(&buf).await
                } else {
                    socket.send_to(&buf, addr).await
                };
                match outcome {
                    Ok(_) => timers.mark_sent(),
                    Err(e) if is_recoverable_send_error(&e) => {
                        warn!(%e, "transient send error, dropping hello");
                    }
                    Err(e) => return Err(TunnelError::Io(e)),
                }
            }

            tokio::time::sleep(hello_interval).await;
        } else {
            tokio::time::sleep(wait).await;
        }
    }
}
