//! Virtual interface allocation: one `ioctl` dance, reduced to a handle that
//! reads and writes raw frames (spec.md §6, "OS interface").

use tokio_tun::Tun;

use crate::config::Mode;
use crate::error::{Result, TunnelError};

/// Opens `dev` in TUN or TAP mode, without the kernel's 4-byte
/// packet-information prefix, and brings the interface up.
pub fn open(dev: &str, mode: Mode) -> Result<Tun> {
    Tun::builder()
        .name(dev)
        .tap(mode == Mode::Tap)
        .packet_info(false)
        .up()
        .try_build()
        .map_err(|e| TunnelError::Device(format!("failed to allocate {dev}: {e}")))
}
