use crate::app::Ticket;
use crate::catalog::load_catalog;
use crate::omdb::{FetchError, MovieRecord, MovieSource};
use crate::search::{SearchOutcome, search_movies};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tokio::task::JoinHandle;

/// Messages sent from request tasks to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    /// The startup catalog batch finished
    CatalogLoaded {
        ticket: Ticket,
        result: Result<Vec<MovieRecord>, FetchError>,
    },

    /// A search and its detail hydration finished
    SearchFinished {
        ticket: Ticket,
        result: Result<SearchOutcome, FetchError>,
    },

    /// The task for this ticket is gone; sent exactly once per task
    Settled(Ticket),
}

/// Held by a request task for its whole lifetime.
///
/// Reports [`AppEvent::Settled`] on drop, so the loading state is released
/// even when the task panics or is aborted.
pub struct InFlight {
    ticket: Ticket,
    tx: Sender<AppEvent>,
}

impl InFlight {
    pub fn new(ticket: Ticket, tx: Sender<AppEvent>) -> Self {
        Self { ticket, tx }
    }

    fn send(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!(ticket = ?self.ticket, "UI loop gone, dropping result");
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        let _ = self.tx.send(AppEvent::Settled(self.ticket));
    }
}

pub fn spawn_catalog_load(
    source: Arc<dyn MovieSource>,
    ids: Vec<String>,
    ticket: Ticket,
    tx: Sender<AppEvent>,
) -> JoinHandle<()> {
    let guard = InFlight::new(ticket, tx);
    tokio::spawn(async move {
        let result = load_catalog(source.as_ref(), &ids).await;
        guard.send(AppEvent::CatalogLoaded { ticket, result });
    })
}

pub fn spawn_search(
    source: Arc<dyn MovieSource>,
    term: String,
    ticket: Ticket,
    tx: Sender<AppEvent>,
) -> JoinHandle<()> {
    let guard = InFlight::new(ticket, tx);
    tokio::spawn(async move {
        let result = search_movies(source.as_ref(), &term).await;
        guard.send(AppEvent::SearchFinished { ticket, result });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::omdb::testing::{StaticSource, movie, stubs};
    use crate::scroll::SCROLL_TOP_THRESHOLD_PX;
    use crate::view::GenreMatch;
    use std::sync::mpsc;

    fn drain(app: &mut App, rx: &mpsc::Receiver<AppEvent>) {
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }
    }

    #[tokio::test]
    async fn test_catalog_task_round_trip() {
        let source: Arc<dyn MovieSource> = Arc::new(StaticSource::with_movies(vec![
            movie("tt1", "Heat", "Crime"),
            movie("tt2", "Up", "Animation"),
        ]));
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(GenreMatch::Exact, SCROLL_TOP_THRESHOLD_PX);

        let ticket = app.begin_catalog_load();
        let ids = vec!["tt1".to_string(), "tt404".to_string(), "tt2".to_string()];
        spawn_catalog_load(source, ids, ticket, tx).await.unwrap();
        assert!(app.loading());

        drain(&mut app, &rx);
        assert!(!app.loading());
        let got: Vec<_> = app.filtered_movies().map(|m| m.imdb_id.as_str()).collect();
        assert_eq!(got, ["tt1", "tt2"]);
    }

    #[tokio::test]
    async fn test_search_task_delivers_result_then_settles() {
        let mut source = StaticSource::with_movies(vec![movie("tt1", "Heat", "Crime")]);
        source.searches.insert("heat".into(), stubs(&["tt1"]));
        let source: Arc<dyn MovieSource> = Arc::new(source);
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(GenreMatch::Exact, SCROLL_TOP_THRESHOLD_PX);

        app.search_term = "heat".to_string();
        let (ticket, term) = app.begin_search().unwrap();
        spawn_search(source, term, ticket, tx).await.unwrap();

        assert!(matches!(rx.recv().unwrap(), AppEvent::SearchFinished { .. }));
        assert!(matches!(rx.recv().unwrap(), AppEvent::Settled(t) if t == ticket));
    }

    #[tokio::test]
    async fn test_aborted_task_still_settles() {
        let mut source = StaticSource::with_movies(vec![movie("tt1", "Heat", "Crime")]);
        source.delays_ms.insert("tt1".into(), 10_000);
        let source: Arc<dyn MovieSource> = Arc::new(source);
        let (tx, rx) = mpsc::channel();
        let mut app = App::new(GenreMatch::Exact, SCROLL_TOP_THRESHOLD_PX);

        let ticket = app.begin_catalog_load();
        let handle = spawn_catalog_load(source, vec!["tt1".to_string()], ticket, tx);
        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        drain(&mut app, &rx);
        assert!(!app.loading());
        assert!(app.catalog().is_empty());
    }
}
