//! Cache invalidation signal. After a block mutation or a publish, the
//! handlers announce which URL paths went stale (the proposal's builder
//! page, the public page). Delivery is best-effort: nothing about the
//! mutation depends on anyone listening.

use tokio::sync::broadcast;

pub fn builder_path(proposal_id: i64) -> String {
    format!("/proposals/{proposal_id}")
}

pub fn public_path(slug: &str) -> String {
    format!("/p/{slug}")
}

#[derive(Clone)]
pub struct Revalidator {
    tx: broadcast::Sender<String>,
}

impl Revalidator {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Revalidator { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Announce stale paths. Send errors (no subscribers) are expected and
    /// ignored.
    pub fn notify<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for path in paths {
            let path = path.into();
            log::debug!("revalidate: {path}");
            let _ = self.tx.send(path);
        }
    }
}

impl Default for Revalidator {
    fn default() -> Self {
        Self::new()
    }
}
