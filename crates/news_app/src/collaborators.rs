use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use news_core::{LoadQuery, SearchEndpoint};
use news_logging::{news_debug, news_warn};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Queried once at the start of every load-cycle attempt.
pub trait Connectivity {
    fn is_connected(&self) -> bool;
}

/// Read-only view of the user's query settings. Implementations must return
/// the current values on every call; the controller never caches them.
pub trait SettingsSource {
    fn keyword(&self) -> String;
    fn section(&self) -> String;
    fn order_by(&self) -> String;

    /// Snapshot for one cycle. Override when the three values come from a
    /// single read.
    fn load_query(&self) -> LoadQuery {
        LoadQuery::new(self.keyword(), self.section(), self.order_by())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConnected;

impl Connectivity for AlwaysConnected {
    fn is_connected(&self) -> bool {
        true
    }
}

/// Treats the network as available when a TCP connection to the endpoint
/// host can be opened within the timeout. The timeout bounds the whole check,
/// name resolution included.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    pub fn for_endpoint(endpoint: &SearchEndpoint) -> Self {
        let base = endpoint.base();
        Self::new(
            base.host_str().unwrap_or_default(),
            base.port_or_known_default().unwrap_or(443),
            DEFAULT_PROBE_TIMEOUT,
        )
    }

    // The resolver thread is left behind if it overruns; its send then fails.
    fn resolve(&self, deadline: Instant) -> Option<Vec<SocketAddr>> {
        let (tx, rx) = mpsc::channel();
        let target = (self.host.clone(), self.port);
        thread::spawn(move || {
            let _ = tx.send(
                target
                    .to_socket_addrs()
                    .map(|addrs| addrs.collect::<Vec<_>>()),
            );
        });
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Ok(addrs)) => Some(addrs),
            Ok(Err(err)) => {
                news_warn!("Cannot resolve {}:{}: {}", self.host, self.port, err);
                None
            }
            Err(_) => {
                news_warn!("Resolving {} timed out", self.host);
                None
            }
        }
    }
}

impl Connectivity for TcpProbe {
    fn is_connected(&self) -> bool {
        let deadline = Instant::now() + self.timeout;
        let Some(addrs) = self.resolve(deadline) else {
            return false;
        };
        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                news_debug!("Probe to {}:{} ran out of time", self.host, self.port);
                break;
            }
            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(_) => return true,
                Err(err) => news_debug!("Probe to {} failed: {}", addr, err),
            }
        }
        false
    }
}
