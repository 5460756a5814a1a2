//! Connectivity probing.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Point-in-time connectivity check. No retries, no latency guarantee; the
/// answer can go stale the moment it is returned.
#[async_trait]
pub trait Connectivity: Send + Sync {
  async fn has_connection(&self) -> bool;
}

/// Probes connectivity by attempting a TCP connect to well-known public
/// endpoints. Any single success counts as online.
pub struct TcpProbe {
  targets: Vec<String>,
  attempt_timeout: Duration,
}

impl TcpProbe {
  pub fn new(targets: Vec<String>, attempt_timeout: Duration) -> Self {
    Self {
      targets,
      attempt_timeout,
    }
  }
}

impl Default for TcpProbe {
  /// DNS-port reachability of two public resolvers, 2s per attempt.
  fn default() -> Self {
    Self::new(
      vec!["1.1.1.1:53".to_string(), "8.8.8.8:53".to_string()],
      Duration::from_secs(2),
    )
  }
}

#[async_trait]
impl Connectivity for TcpProbe {
  async fn has_connection(&self) -> bool {
    for target in &self.targets {
      match timeout(self.attempt_timeout, TcpStream::connect(target.as_str())).await {
        Ok(Ok(_)) => return true,
        Ok(Err(e)) => debug!("connect to {} failed: {}", target, e),
        Err(_) => debug!("connect to {} timed out", target),
      }
    }
    false
  }
}

/// Fixed-answer probe, used by `--offline` and in tests.
pub struct StaticProbe(pub bool);

#[async_trait]
impl Connectivity for StaticProbe {
  async fn has_connection(&self) -> bool {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_static_probe_answers_fixed() {
    assert!(StaticProbe(true).has_connection().await);
    assert!(!StaticProbe(false).has_connection().await);
  }

  #[tokio::test]
  async fn test_tcp_probe_finds_local_listener() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let probe = TcpProbe::new(vec![addr.to_string()], Duration::from_secs(1));
    assert!(probe.has_connection().await);
  }

  #[tokio::test]
  async fn test_tcp_probe_fails_on_closed_port() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let probe = TcpProbe::new(vec![addr.to_string()], Duration::from_millis(500));
    assert!(!probe.has_connection().await);
  }
}
