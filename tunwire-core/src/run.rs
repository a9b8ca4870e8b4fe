//! Wires a validated [`Config`] into device, socket, shared state, and the
//! four concurrent tasks (spec.md §5).

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::peer::{self, CurrentPeer};
use crate::tasks::{hello, liveness, receiver, sender, HelloTarget, SendTarget};
use crate::timers::Timers;
use crate::wire::FrameCipher;
use crate::{iface, socket};

pub async fn run(cfg: Config) -> Result<()> {
    info!(dev = %cfg.dev, ?cfg.mode, "allocating virtual interface");
    let tun = iface::open(&cfg.dev, cfg.mode)?;
    let (tun_read, tun_write) = tokio::io::split(tun);

    info!(local = ?cfg.local, remote = ?cfg.remote, "opening socket");
    let udp = Arc::new(socket::open(cfg.local, cfg.remote).await?);

    let cipher = Arc::new(FrameCipher::new(&cfg.key)?);
    let timers = Timers::new();

    let (send_target, hello_target, peer_tx) = match cfg.remote {
        Some(addr) => (SendTarget::Fixed(addr), HelloTarget::Fixed(addr), None),
        None => {
            let (tx, rx) = peer::channel();
            let current = CurrentPeer::new(None);
            (
                SendTarget::Floating { rx, current: current.clone() },
                HelloTarget::Floating(current),
                Some(tx),
            )
        }
    };

    let sender_handle = tokio::spawn(sender::run(
        tun_read,
        udp.clone(),
        cipher.clone(),
        cfg.max_pay,
        timers.clone(),
        send_target,
    ));

    let receiver_handle = tokio::spawn(receiver::run(
        udp.clone(),
        tun_write,
        cipher.clone(),
        timers.clone(),
        peer_tx,
    ));

    let hello_handle = (cfg.hello_secs > 0).then(|| {
        let hello_interval = Duration::from_secs(cfg.hello_secs);
        tokio::spawn(hello::run(
            udp.clone(),
            cipher.clone(),
            timers.clone(),
            hello_target,
            hello_interval,
        ))
    });

    if cfg.log_down_secs > 0 {
        let log_down = Duration::from_secs(cfg.log_down_secs);
        let liveness_timers = timers.clone();
        tokio::spawn(async move { liveness::run(liveness_timers, log_down).await });
    }

    // Any data-plane task finishing is fatal (spec.md §5: no in-band
    // shutdown; fatal errors terminate the process).
    let result = match hello_handle {
        Some(hello_handle) => tokio::select! {
            r = sender_handle => join_result(r),
            r = receiver_handle => join_result(r),
            r = hello_handle => join_result(r),
        },
        None => tokio::select! {
            r = sender_handle => join_result(r),
            r = receiver_handle => join_result(r),
        },
    };

    if let Err(ref e) = result {
        error!(%e, "task exited with error");
    }
    result
}

fn join_result(r: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match r {
        Ok(inner) => inner,
        Err(join_err) => Err(crate::error::TunnelError::Task(format!("task panicked: {join_err}"))),
    }
}
