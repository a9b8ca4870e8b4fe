//! The four concurrent tasks (spec.md §5): Sender, Receiver, Hello,
//! Liveness. Shared plumbing that doesn't belong to the pure algorithmic
//! core lives here.

pub mod hello;
pub mod liveness;
pub mod receiver;
pub mod sender;

use std::net::SocketAddr;

use tracing::info;

use crate::peer::{CurrentPeer, PeerRx};

/// Where Sender currently sends outbound datagrams: statically configured
/// (client mode) or learned from the Receiver task (server mode).
pub enum SendTarget {
    Fixed(SocketAddr),
    Floating { rx: PeerRx, current: CurrentPeer },
}

impl SendTarget {
    /// Drains any newly learned address, then returns the address to send
    /// to, or `None` if none has been learned yet.
    pub fn resolve(&mut self) -> Option<SocketAddr> {
        match self {
            SendTarget::Fixed(addr) => Some(*addr),
            SendTarget::Floating { rx, current } => {
                if let Some(addr) = rx.try_consult() {
                    if current.get() != Some(addr) {
                        info!(%addr, "remote address changed");
                    }
                    current.set(addr);
                }
                current.get()
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SendTarget::Fixed(_))
    }
}

/// Hello's view of the same destination: read-only, no channel ownership —
/// only Sender consults the learning channel (spec.md §5).
pub enum HelloTarget {
    Fixed(SocketAddr),
    Floating(CurrentPeer),
}

impl HelloTarget {
    pub fn resolve(&self) -> Option<SocketAddr> {
        match self {
            HelloTarget::Fixed(addr) => Some(*addr),
            HelloTarget::Floating(current) => current.get(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, HelloTarget::Fixed(_))
    }
}

/// `true` for the UDP send errors spec.md §4.3/§7 marks as transient and
/// non-fatal: the current packet is dropped and the loop continues.
pub fn is_recoverable_send_error(e: &std::io::Error) -> bool {
    use std::io::ErrorKind;
    matches!(
        e.kind(),
        ErrorKind::ConnectionRefused | ErrorKind::HostUnreachable | ErrorKind::NetworkUnreachable
    )
}
