//! Native candidate source backed by local UDP sockets.
//!
//! With no STUN or relay servers configured, ICE gathering only produces
//! host candidates: the addresses of the local interfaces a socket would
//! send from. This connector discovers them the same way, by binding a UDP
//! socket per address family and connecting it towards a documentation
//! address. Connecting a UDP socket only selects a route; nothing is sent.

use std::collections::VecDeque;
use std::net::{SocketAddr, UdpSocket};

use futures::future::BoxFuture;

use super::{PeerConnection, PeerConnector};
use crate::error_handling::ProbeError;

// TEST-NET-1 and the IPv6 documentation prefix; never actually contacted.
const IPV4_ROUTE_PROBE: &str = "192.0.2.1:9";
const IPV6_ROUTE_PROBE: &str = "[2001:db8::1]:9";

/// Host-candidate priority for the given local preference (RFC 8445 §5.1.2.1).
fn host_priority(local_preference: u32) -> u32 {
    (126 << 24) | (local_preference << 8) | 255
}

/// Opens "peer connections" that gather host candidates from local sockets.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalInterfaceConnector;

impl LocalInterfaceConnector {
    pub fn new() -> Self {
        Self
    }
}

fn bind_routed(bind: &str, route: &str) -> std::io::Result<UdpSocket> {
    let socket = UdpSocket::bind(bind)?;
    socket.connect(route)?;
    Ok(socket)
}

impl PeerConnector for LocalInterfaceConnector {
    fn open(&self) -> Result<Box<dyn PeerConnection>, ProbeError> {
        let mut sockets = Vec::new();
        let mut last_error = None;

        for (bind, route) in [("0.0.0.0:0", IPV4_ROUTE_PROBE), ("[::]:0", IPV6_ROUTE_PROBE)] {
            match bind_routed(bind, route) {
                Ok(socket) => sockets.push(socket),
                Err(e) => {
                    log::debug!("No {} route for host candidates: {}", route, e);
                    last_error = Some(e);
                }
            }
        }

        if sockets.is_empty() {
            return Err(ProbeError::Setup(last_error.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no local route")
            })));
        }

        let mut pending = VecDeque::new();
        for (index, socket) in sockets.iter().enumerate() {
            let addr: SocketAddr = socket.local_addr()?;
            if addr.ip().is_unspecified() {
                continue;
            }
            let preference = 65535 - u32::try_from(index).unwrap_or(0);
            pending.push_back(format!(
                "candidate:{} 1 udp {} {} {} typ host generation 0",
                index + 1,
                host_priority(preference),
                addr.ip(),
                addr.port()
            ));
        }

        Ok(Box::new(LocalConnection {
            sockets,
            pending,
        }))
    }
}

struct LocalConnection {
    sockets: Vec<UdpSocket>,
    pending: VecDeque<String>,
}

impl PeerConnection for LocalConnection {
    fn next_candidate(&mut self) -> BoxFuture<'_, Option<String>> {
        let next = self.pending.pop_front();
        Box::pin(async move { next })
    }

    fn close(&mut self) {
        // Dropping the sockets releases the bound ports.
        self.sockets.clear();
        self.pending.clear();
    }
}
