//! End-to-end app flow tests
//!
//! Drives `App` the way the event loop does: queued actions go through
//! `Services::dispatch` against mock servers and the resulting events are
//! applied back. Flow: Search -> Enrich -> Cards -> Favorite / Trailer.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Mock, Server, ServerGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use cinezy::api::{OmdbClient, TrailerClient, TrailerOutcome, TrailerSource};
use cinezy::app::App;
use cinezy::launch::Launcher;
use cinezy::models::Tab;
use cinezy::storage::{KeyValueStore, MemoryStore, FAVORITES_KEY};
use cinezy::tasks::{AppEvent, Services};

const SEARCH_BODY: &str = r#"{
    "Search": [
        {"Title":"The Avengers","Year":"2012","imdbID":"tt0848228","Type":"movie","Poster":"N/A"},
        {"Title":"Avengers: Endgame","Year":"2019","imdbID":"tt4154796","Type":"movie","Poster":"N/A"}
    ],
    "Response": "True"
}"#;

fn detail_body(imdb_id: &str, title: &str, year: &str) -> String {
    format!(
        r#"{{"Title":"{}","Year":"{}","Runtime":"143 min","Genre":"Action, Sci-Fi","Plot":"Heroes assemble.","imdbRating":"8.0","imdbID":"{}","Type":"movie","Response":"True"}}"#,
        title, year, imdb_id
    )
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

/// Test harness: app, services against mock servers, and the event channel
struct Harness {
    app: App,
    services: Services,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl Harness {
    fn new(omdb: &ServerGuard, youtube: &ServerGuard, invidious: &ServerGuard) -> Self {
        let services = Services::new(
            OmdbClient::with_base_url("test_key", omdb.url()),
            TrailerClient::with_urls(youtube.url(), invidious.url()),
            Launcher::new(),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            app: App::new(Box::new(MemoryStore::new())),
            services,
            tx,
            rx,
        }
    }

    /// Dispatch queued actions and apply events until nothing more arrives
    async fn settle(&mut self) {
        loop {
            for action in self.app.drain_actions() {
                self.services.dispatch(action, self.tx.clone());
            }
            match tokio::time::timeout(Duration::from_millis(500), self.rx.recv()).await {
                Ok(Some(event)) => self.app.apply_event(event),
                _ => break,
            }
        }
    }

    fn card_ids(&self) -> Vec<String> {
        self.app
            .visible_cards()
            .iter()
            .map(|m| m.imdb_id.clone())
            .collect()
    }
}

async fn mock_search(server: &mut ServerGuard, term: &str, body: &str) -> Mock {
    server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("s".into(), term.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

async fn mock_detail(server: &mut ServerGuard, imdb_id: &str, body: String, hits: usize) -> Mock {
    server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("i".into(), imdb_id.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(hits)
        .create_async()
        .await
}

// =============================================================================
// Search Flow
// =============================================================================

#[tokio::test]
async fn test_startup_search_renders_enriched_cards() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let search = mock_search(&mut omdb, "Avengers", SEARCH_BODY).await;
    let first = mock_detail(
        &mut omdb,
        "tt0848228",
        detail_body("tt0848228", "The Avengers", "2012"),
        1,
    )
    .await;
    let second = mock_detail(
        &mut omdb,
        "tt4154796",
        detail_body("tt4154796", "Avengers: Endgame", "2019"),
        1,
    )
    .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.startup();
    assert!(h.app.search.loading.is_loading());
    h.settle().await;

    search.assert_async().await;
    first.assert_async().await;
    second.assert_async().await;

    assert_eq!(h.app.search.term, "Avengers");
    assert!(!h.app.search.loading.is_loading());
    assert_eq!(h.card_ids(), vec!["tt0848228", "tt4154796"]);

    let card = &h.app.visible_cards()[0];
    assert_eq!(card.genre_label(), "Action, Sci-Fi");
    assert_eq!(card.runtime_label(), "143 min");
    assert_eq!(card.plot_or_default(), "Heroes assemble.");
}

#[tokio::test]
async fn test_zero_results_issue_no_lookups() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _search = mock_search(
        &mut omdb,
        "qwxzzy",
        r#"{"Response":"False","Error":"Movie not found!"}"#,
    )
    .await;
    let lookups = omdb
        .mock("GET", "/")
        .match_query(Matcher::Regex("i=".into()))
        .expect(0)
        .create_async()
        .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.begin_search("qwxzzy");
    h.settle().await;

    lookups.assert_async().await;
    assert!(h.app.visible_cards().is_empty());
    assert!(!h.app.search.loading.is_loading());
}

#[tokio::test]
async fn test_search_failure_shows_empty_grid() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _search = omdb
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.begin_search("Heat");
    h.settle().await;

    assert!(h.app.visible_cards().is_empty());
    assert!(!h.app.search.loading.is_loading());
}

#[tokio::test]
async fn test_newer_search_wins_over_stale_one() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _old = mock_search(
        &mut omdb,
        "Alien",
        r#"{"Search":[{"Title":"Alien","Year":"1979","imdbID":"tt0078748","Type":"movie"}],"Response":"True"}"#,
    )
    .await;
    let _new = mock_search(
        &mut omdb,
        "Heat",
        r#"{"Search":[{"Title":"Heat","Year":"1995","imdbID":"tt0113277","Type":"movie"}],"Response":"True"}"#,
    )
    .await;
    let stale_lookup = mock_detail(
        &mut omdb,
        "tt0078748",
        detail_body("tt0078748", "Alien", "1979"),
        0,
    )
    .await;
    let lookup = mock_detail(
        &mut omdb,
        "tt0113277",
        detail_body("tt0113277", "Heat", "1995"),
        1,
    )
    .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.begin_search("Alien");
    h.app.begin_search("Heat");
    h.settle().await;

    stale_lookup.assert_async().await;
    lookup.assert_async().await;
    assert_eq!(h.app.search.term, "Heat");
    assert_eq!(h.card_ids(), vec!["tt0113277"]);
}

#[tokio::test]
async fn test_typed_search_from_keyboard() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let search = mock_search(
        &mut omdb,
        "Heat",
        r#"{"Search":[{"Title":"Heat","Year":"1995","imdbID":"tt0113277","Type":"movie"}],"Response":"True"}"#,
    )
    .await;
    let _lookup = mock_detail(
        &mut omdb,
        "tt0113277",
        detail_body("tt0113277", "Heat", "1995"),
        1,
    )
    .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.handle_key(key(KeyCode::Char('/')));
    for c in "Heat".chars() {
        h.app.handle_key(key(KeyCode::Char(c)));
    }
    h.app.handle_key(key(KeyCode::Enter));
    h.settle().await;

    search.assert_async().await;
    assert_eq!(h.card_ids(), vec!["tt0113277"]);
}

// =============================================================================
// Favorites Flow
// =============================================================================

#[tokio::test]
async fn test_favorite_from_results_is_persisted() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _search = mock_search(&mut omdb, "Avengers", SEARCH_BODY).await;
    let _first = mock_detail(
        &mut omdb,
        "tt0848228",
        detail_body("tt0848228", "The Avengers", "2012"),
        1,
    )
    .await;
    let _second = mock_detail(
        &mut omdb,
        "tt4154796",
        detail_body("tt4154796", "Avengers: Endgame", "2019"),
        1,
    )
    .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.startup();
    h.settle().await;

    // Second card, then favorite it
    h.app.handle_key(key(KeyCode::Right));
    h.app.handle_key(key(KeyCode::Char('f')));
    assert!(h.app.is_favorite("tt4154796"));

    let raw = h.app.store().get(FAVORITES_KEY).unwrap();
    assert!(raw.contains("tt4154796"));
    assert!(raw.contains("Action, Sci-Fi"));

    h.app.handle_key(key(KeyCode::Tab));
    assert_eq!(h.app.tab, Tab::Favorites);
    assert_eq!(h.card_ids(), vec!["tt4154796"]);

    // Toggling again from the favorites tab removes it
    h.app.handle_key(key(KeyCode::Char('f')));
    assert!(h.app.visible_cards().is_empty());
}

#[tokio::test]
async fn test_unenriched_favorite_is_upgraded() {
    let mut omdb = Server::new_async().await;
    let youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _search = mock_search(
        &mut omdb,
        "Heat",
        r#"{"Search":[{"Title":"Heat","Year":"1995","imdbID":"tt0113277","Type":"movie"}],"Response":"True"}"#,
    )
    .await;
    let failing = omdb
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("i".into(), "tt0113277".into()))
        .with_status(503)
        .create_async()
        .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.begin_search("Heat");
    h.settle().await;
    assert!(!h.app.visible_cards()[0].is_enriched());

    failing.remove_async().await;
    let _recovered = mock_detail(
        &mut omdb,
        "tt0113277",
        detail_body("tt0113277", "Heat", "1995"),
        1,
    )
    .await;

    h.app.handle_key(key(KeyCode::Char('f')));
    h.settle().await;

    let favorite = h.app.favorites.get("tt0113277").unwrap();
    assert!(favorite.is_enriched());
    assert!(h
        .app
        .store()
        .get(FAVORITES_KEY)
        .unwrap()
        .contains("Heroes assemble."));
}

// =============================================================================
// Trailer Flow
// =============================================================================

#[tokio::test]
async fn test_trailer_key_opens_overlay() {
    let mut omdb = Server::new_async().await;
    let mut youtube = Server::new_async().await;
    let invidious = Server::new_async().await;

    let _search = mock_search(
        &mut omdb,
        "Heat",
        r#"{"Search":[{"Title":"Heat","Year":"1995","imdbID":"tt0113277","Type":"movie"}],"Response":"True"}"#,
    )
    .await;
    let _lookup = mock_detail(
        &mut omdb,
        "tt0113277",
        detail_body("tt0113277", "Heat", "1995"),
        1,
    )
    .await;
    let scrape = youtube
        .mock("GET", "/results")
        .match_query(Matcher::UrlEncoded(
            "search_query".into(),
            "Heat 1995 official trailer".into(),
        ))
        .with_status(200)
        .with_body(r#"{"videoRenderer":{"videoId":"0xbBLJ1WGwQ"}}"#)
        .expect(1)
        .create_async()
        .await;

    let mut h = Harness::new(&omdb, &youtube, &invidious);
    h.app.begin_search("Heat");
    h.settle().await;

    h.app.handle_key(key(KeyCode::Char('t')));
    assert!(h.app.trailer_pending("tt0113277"));
    // A second press while the lookup runs is ignored
    h.app.handle_key(key(KeyCode::Char('t')));
    h.settle().await;

    scrape.assert_async().await;
    assert!(!h.app.trailer_pending("tt0113277"));
    let view = h.app.trailer.as_ref().unwrap();
    assert_eq!(view.title, "Heat");
    assert_eq!(
        view.outcome,
        TrailerOutcome::Found {
            video_id: "0xbBLJ1WGwQ".into(),
            source: TrailerSource::Scrape,
        }
    );

    // Esc closes the trailer, then the card
    h.app.handle_key(key(KeyCode::Esc));
    assert!(h.app.trailer.is_none());
    assert!(h.app.card.is_some());
    h.app.handle_key(key(KeyCode::Esc));
    assert!(h.app.card.is_none());
}
