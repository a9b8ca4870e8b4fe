//! Single-slot, non-blocking channel carrying the learned peer address from
//! the receive path to the send path (spec.md §3, "Peer-address cell").
//!
//! Built on a bounded `tokio::sync::mpsc` channel of capacity 1 rather than
//! `arc-swap`/`watch`, which always overwrite: a `try_send` that finds the
//! slot still full is a no-op, matching spec.md §4.4 exactly ("if the slot is
//! full, do nothing — the sender will observe the newer value on its next
//! consult").

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

pub fn channel() -> (PeerTx, PeerRx) {
    let (tx, rx) = mpsc::channel(1);
    (PeerTx { tx }, PeerRx { rx })
}

#[derive(Clone)]
pub struct PeerTx {
    tx: mpsc::Sender<SocketAddr>,
}

impl PeerTx {
    /// Publishes a newly learned peer address. Drops the update silently if
    /// the slot is already occupied by an unconsumed value.
    pub fn publish(&self, addr: SocketAddr) {
        let _ = self.tx.try_send(addr);
    }
}

pub struct PeerRx {
    rx: mpsc::Receiver<SocketAddr>,
}

impl PeerRx {
    /// Consults the channel without blocking; returns the latest address if
    /// one has arrived since the last consult.
    pub fn try_consult(&mut self) -> Option<SocketAddr> {
        self.rx.try_recv().ok()
    }
}

/// The peer address Sender currently sends to, shared with Hello so both
/// emitters agree on a destination without either owning the learning
/// channel (only Sender consults [`PeerRx`]; spec.md §5 assigns that link
/// to Receiver→Sender alone).
#[derive(Clone)]
pub struct CurrentPeer(Arc<Mutex<Option<SocketAddr>>>);

impl CurrentPeer {
    pub fn new(initial: Option<SocketAddr>) -> Self {
        CurrentPeer(Arc::new(Mutex::new(initial)))
    }

    pub fn get(&self) -> Option<SocketAddr> {
        *self.0.lock().unwrap()
    }

    pub fn set(&self, addr: SocketAddr) {
        *self.0.lock().unwrap() = Some(addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_publish_is_dropped_until_consumed() {
        let (tx, mut rx) = channel();
        let a: SocketAddr = "127.0.0.1:1000".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:2000".parse().unwrap();
        tx.publish(a);
        tx.publish(b); // slot full, dropped
        assert_eq!(rx.try_consult(), Some(a));
        assert_eq!(rx.try_consult(), None);
    }

    #[test]
    fn publish_after_consult_is_observed() {
        let (tx, mut rx) = channel();
        let a: SocketAddr = "127.0.0.1:1000".parse().unwrap();
        let b: SocketAddr = "127.0.0.1:2000".parse().unwrap();
        tx.publish(a);
        assert_eq!(rx.try_consult(), Some(a));
        tx.publish(b);
        assert_eq!(rx.try_consult(), Some(b));
    }
}
