//! UDP socket setup: connected in client mode (`remote` configured), bound
//! only in server mode, where the peer is learned from traffic instead.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::error::{Result, TunnelError};

pub async fn open(local: Option<SocketAddr>, remote: Option<SocketAddr>) -> Result<UdpSocket> {
    let bind_addr = local.unwrap_or_else(|| "0.0.0.0:0".parse().unwrap());
    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| TunnelError::Socket(format!("failed to bind {bind_addr}: {e}")))?;

    if let Some(remote) = remote {
        socket
            .connect(remote)
            .await
            .map_err(|e| TunnelError::Socket(format!("failed to connect to {remote}: {e}")))?;
    }

    Ok(socket)
}
