use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Message pushed to connected browsers over the live-reload socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReloadMessage {
  /// A rebuild succeeded; the page should refresh.
  Reload,

  /// A rebuild failed; the page keeps the last good build and shows why.
  BuildError { message: String },
}

/// Fan-out channel between the rebuild loop and every connected client.
pub struct ReloadHub {
  tx: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
  pub fn new() -> Self {
    let (tx, _) = broadcast::channel(16);
    Self { tx }
  }

  /// Send to every connected client. A hub with no clients drops the
  /// message, which is fine: a page that connects later gets fresh assets
  /// anyway.
  pub fn broadcast(&self, message: ReloadMessage) {
    let _ = self.tx.send(message);
  }

  pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
    self.tx.subscribe()
  }

  pub fn client_count(&self) -> usize {
    self.tx.receiver_count()
  }
}

impl Default for ReloadHub {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_serialize_tagged() {
    let reload = serde_json::to_string(&ReloadMessage::Reload).unwrap();
    assert_eq!(reload, r#"{"type":"reload"}"#);

    let error =
      serde_json::to_string(&ReloadMessage::BuildError { message: "boom".to_string() }).unwrap();
    assert_eq!(error, r#"{"type":"build-error","message":"boom"}"#);
  }

  #[tokio::test]
  async fn broadcast_reaches_every_subscriber() {
    let hub = ReloadHub::new();
    let mut first = hub.subscribe();
    let mut second = hub.subscribe();
    assert_eq!(hub.client_count(), 2);

    hub.broadcast(ReloadMessage::Reload);

    assert!(matches!(first.recv().await.unwrap(), ReloadMessage::Reload));
    assert!(matches!(second.recv().await.unwrap(), ReloadMessage::Reload));
  }
}
