//! TUN/TAP read → fragment → encrypt → UDP write (spec.md §4.3).

use std::sync::Arc;

use tokio::io::{AsyncReadExt, ReadHalf};
use tokio::net::UdpSocket;
use tokio_tun::Tun;
use tracing::{debug, warn};

use crate::error::{Result, TunnelError};
use crate::fragment::fragment;
use crate::id::IdGen;
use crate::tasks::{is_recoverable_send_error, SendTarget};
use crate::timers::Timers;
use crate::wire::{FrameCipher, IO_BUF_LEN};

pub async fn run(
    mut tun_read: ReadHalf<Tun>,
    socket: Arc<UdpSocket>,
    cipher: Arc<FrameCipher>,
    max_pay: usize,
    timers: Timers,
    mut target: SendTarget,
) -> Result<()> {
    let mut ids = IdGen::new();
    let mut buf = vec![0u8; IO_BUF_LEN];

    loop {
        let n = tun_read.read(&mut buf).await.map_err(TunnelError::Io)?;
        if n == 0 {
            continue;
        }

        let id = ids.next();
        let frags = fragment(id, &buf[..n], max_pay, &cipher);

        for frag in frags {
            let Some(addr) = target.resolve() else {
                debug!("no known peer address yet, dropping packet");
                break;
            };

            let outcome = if target.is_connected() {
                socket.send(&frag.bytes).await
            } else {
                socket.send_to(&frag.bytes, addr).await
            };

            match outcome {
                Ok(_) => timers.mark_sent(),
                Err(e) if is_recoverable_send_error(&e) => {
                    warn!(%e, "transient send error, dropping packet");
                    break;
                }
                Err(e) => return Err(TunnelError::Io(e)),
            }
        }
    }
}
