// ── CatalogWorker ────────────────────────────────────────────────────────────
//
// Runs catalog lookups on a small tokio runtime so the winit event loop never
// waits on the network. Results are posted back over a channel and drained by
// `poll` once per update tick. A cancelled lookup is aborted; if its result
// was already queued, the game state rejects it by ticket.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use image::RgbaImage;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{BookRecord, CatalogClient, CatalogError};

/// Identifies one shelf lookup for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A book plus its decoded cover, if one could be downloaded.
#[derive(Debug, Clone)]
pub struct FetchedBook {
    pub record: BookRecord,
    pub cover: Option<RgbaImage>,
}

/// A finished lookup, successful or not.
#[derive(Debug)]
pub struct Completed {
    pub ticket: Ticket,
    pub result: Result<FetchedBook, CatalogError>,
}

pub struct CatalogWorker {
    runtime: Runtime,
    client: Arc<dyn CatalogClient>,
    tx: UnboundedSender<Completed>,
    rx: UnboundedReceiver<Completed>,
    in_flight: HashMap<Ticket, JoinHandle<()>>,
}

impl CatalogWorker {
    pub fn new(client: Arc<dyn CatalogClient>) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("catalog")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self { runtime, client, tx, rx, in_flight: HashMap::new() })
    }

    /// Start a lookup for `ticket`. Returns immediately.
    pub fn request(&mut self, ticket: Ticket) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let handle = self.runtime.spawn(async move {
            let result = lookup(client.as_ref()).await;
            // The receiver only goes away with the worker itself.
            let _ = tx.send(Completed { ticket, result });
        });
        self.in_flight.insert(ticket, handle);
        debug!(%ticket, "catalog lookup started");
    }

    /// Abort the lookup for `ticket` if it is still running.
    pub fn cancel(&mut self, ticket: Ticket) {
        if let Some(handle) = self.in_flight.remove(&ticket) {
            handle.abort();
            debug!(%ticket, "catalog lookup cancelled");
        }
    }

    /// Drain every lookup that finished since the last call. Never blocks.
    pub fn poll(&mut self) -> Vec<Completed> {
        let mut done = Vec::new();
        while let Ok(completed) = self.rx.try_recv() {
            self.in_flight.remove(&completed.ticket);
            done.push(completed);
        }
        done
    }

    /// Number of lookups started and neither finished nor cancelled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// One full lookup: a random book, then its cover on a best-effort basis.
pub async fn lookup(client: &dyn CatalogClient) -> Result<FetchedBook, CatalogError> {
    let record = client.fetch_random_book().await?;

    let cover = match record.cover_url.as_deref() {
        Some(url) => match client.fetch_cover(url).await {
            Ok(bytes) => decode_cover(&bytes),
            Err(e) => {
                debug!(error = %e, "cover download failed");
                None
            }
        },
        None => None,
    };

    Ok(FetchedBook { record, cover })
}

fn decode_cover(bytes: &[u8]) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img.to_rgba8()),
        Err(e) => {
            debug!(error = %e, "cover image could not be decoded");
            None
        }
    }
}
