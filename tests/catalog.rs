use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use where_is_everybody::catalog::google::*;
use where_is_everybody::catalog::*;

// ── helpers ──────────────────────────────────────────────────────────────────

fn book(title: &str) -> BookRecord {
    BookRecord { title: title.into(), authors: vec![], description: None, cover_url: None }
}

/// Answers every lookup with the same book after `delay`.
struct SlowShelf {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowShelf {
    fn new(delay: Duration) -> Self {
        Self { delay, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl CatalogClient for SlowShelf {
    async fn fetch_random_book(&self) -> Result<BookRecord, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(book("Moby-Dick"))
    }

    async fn fetch_cover(&self, _url: &str) -> Result<Vec<u8>, CatalogError> {
        Err(CatalogError::Http(404))
    }
}

fn drain_until(worker: &mut CatalogWorker, deadline: Duration) -> Vec<Completed> {
    let end = Instant::now() + deadline;
    let mut done = Vec::new();
    while Instant::now() < end {
        done.extend(worker.poll());
        if !done.is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    done
}

/// Local HTTP server answering one connection per canned `(status, body)`,
/// in order. Resolves to the request line of every request it saw.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/books/v1/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let mut request_lines = Vec::new();
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let request = String::from_utf8_lossy(&request);
            request_lines.push(request.lines().next().unwrap_or_default().to_string());

            let reply = format!(
                "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        }
        request_lines
    });

    (base, handle)
}

const ONE_VOLUME: &str = r#"{ "items": [ { "volumeInfo": { "title": "The Haunting of Hill House", "authors": ["Shirley Jackson"] } } ] }"#;

// ── Response parsing ─────────────────────────────────────────────────────────

#[test]
fn volumes_map_to_book_records() {
    let body = r#"{
        "totalItems": 2,
        "items": [
            { "volumeInfo": {
                "title": "Moby-Dick",
                "subtitle": "Or, The Whale",
                "authors": ["Herman Melville"],
                "description": "Call me Ishmael.",
                "imageLinks": { "smallThumbnail": "http://books.example/s.jpg", "thumbnail": "http://books.example/t.jpg" }
            } },
            { "volumeInfo": { "title": "Untold Tales" } }
        ]
    }"#;
    let books = parse_volumes(body).unwrap();
    assert_eq!(books.len(), 2);

    let moby = &books[0];
    assert_eq!(moby.title, "Moby-Dick: Or, The Whale");
    assert_eq!(moby.authors, vec!["Herman Melville"]);
    assert_eq!(moby.description.as_deref(), Some("Call me Ishmael."));
    assert_eq!(moby.cover_url.as_deref(), Some("https://books.example/t.jpg"));

    assert_eq!(books[1], book("Untold Tales"));
}

#[test]
fn small_thumbnail_is_used_when_it_is_the_only_link() {
    let body = r#"{ "items": [ { "volumeInfo": {
        "title": "Dubliners",
        "imageLinks": { "smallThumbnail": "https://books.example/s.jpg" }
    } } ] }"#;
    let books = parse_volumes(body).unwrap();
    assert_eq!(books[0].cover_url.as_deref(), Some("https://books.example/s.jpg"));
}

#[test]
fn untitled_volumes_and_blank_descriptions_are_dropped() {
    let body = r#"{ "items": [
        { "volumeInfo": { "authors": ["Anon"] } },
        { "volumeInfo": { "title": "   " } },
        { "volumeInfo": { "title": "Ulysses", "description": "  " } },
        { }
    ] }"#;
    let books = parse_volumes(body).unwrap();
    assert_eq!(books, vec![book("Ulysses")]);
}

#[test]
fn search_without_items_is_empty() {
    assert_eq!(parse_volumes(r#"{ "totalItems": 0 }"#), Err(CatalogError::Empty));
    assert_eq!(parse_volumes(r#"{ "items": [] }"#), Err(CatalogError::Empty));
}

#[test]
fn garbage_body_is_malformed() {
    let err = parse_volumes("<html>oops</html>").unwrap_err();
    assert_eq!(err.kind(), "malformed");
}

#[test]
fn status_codes_are_classified() {
    assert_eq!(classify_status(200), None);
    assert_eq!(classify_status(204), None);
    assert_eq!(classify_status(401), Some(CatalogError::Auth(401)));
    assert_eq!(classify_status(403), Some(CatalogError::Auth(403)));
    assert_eq!(classify_status(429), Some(CatalogError::RateLimited));
    assert_eq!(classify_status(404), Some(CatalogError::Http(404)));
    assert_eq!(classify_status(503), Some(CatalogError::Http(503)));
}

#[test]
fn byline_joins_authors() {
    let mut b = book("Good Omens");
    assert_eq!(b.byline(), None);
    b.authors = vec!["Terry Pratchett".into()];
    assert_eq!(b.byline().as_deref(), Some("Terry Pratchett"));
    b.authors.push("Neil Gaiman".into());
    assert_eq!(b.byline().as_deref(), Some("Terry Pratchett and Neil Gaiman"));
    b.authors.insert(0, "Someone Else".into());
    assert_eq!(b.byline().as_deref(), Some("Someone Else, Terry Pratchett and Neil Gaiman"));
}

// ── Random choice ────────────────────────────────────────────────────────────

#[test]
fn random_query_stays_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let q = VolumeQuery::random(&mut rng);
        assert!(SUBJECTS.contains(&q.subject));
        assert!(q.start_index <= MAX_START_INDEX);
    }
}

#[test]
fn random_query_is_reproducible_from_a_seed() {
    let a = VolumeQuery::random(&mut StdRng::seed_from_u64(42));
    let b = VolumeQuery::random(&mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn query_params_carry_the_key_last() {
    let q = VolumeQuery { subject: "horror", start_index: 12 };
    let params = q.params(Some("k3y"));
    assert_eq!(params[0], ("q", "subject:horror".to_string()));
    assert_eq!(params[1], ("startIndex", "12".to_string()));
    assert_eq!(params[2], ("maxResults", PAGE_SIZE.to_string()));
    assert_eq!(params.last().unwrap(), &("key", "k3y".to_string()));
    assert!(q.params(None).iter().all(|(k, _)| *k != "key"));
}

#[test]
fn pick_takes_one_of_the_books() {
    let shelf = vec![book("A"), book("B"), book("C")];
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let chosen = pick(shelf.clone(), &mut rng).unwrap();
        assert!(shelf.contains(&chosen));
    }
    assert_eq!(pick(vec![], &mut rng), Err(CatalogError::Empty));
}

// ── Lookup & worker ──────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_cover_still_yields_the_book() {
    let client = SlowShelf::new(Duration::ZERO);
    let fetched = lookup(&client).await.unwrap();
    assert_eq!(fetched.record.title, "Moby-Dick");
    assert!(fetched.cover.is_none());
}

#[test]
fn worker_delivers_results_with_their_ticket() {
    let client = Arc::new(SlowShelf::new(Duration::from_millis(10)));
    let mut worker = CatalogWorker::new(client.clone()).unwrap();
    worker.request(Ticket(1));
    assert_eq!(worker.in_flight(), 1);

    let done = drain_until(&mut worker, Duration::from_secs(5));
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].ticket, Ticket(1));
    assert_eq!(done[0].result.as_ref().unwrap().record.title, "Moby-Dick");
    assert_eq!(worker.in_flight(), 0);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cancelled_lookup_never_reports_back() {
    let client = Arc::new(SlowShelf::new(Duration::from_millis(300)));
    let mut worker = CatalogWorker::new(client.clone()).unwrap();

    worker.request(Ticket(1));
    worker.cancel(Ticket(1));
    assert_eq!(worker.in_flight(), 0);

    worker.request(Ticket(2));
    let done = drain_until(&mut worker, Duration::from_secs(5));
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].ticket, Ticket(2));

    // Give the cancelled task time to have finished, had it not been aborted.
    std::thread::sleep(Duration::from_millis(400));
    assert!(worker.poll().is_empty());
}

#[test]
fn cancel_of_unknown_ticket_is_ignored() {
    let mut worker = CatalogWorker::new(Arc::new(SlowShelf::new(Duration::ZERO))).unwrap();
    worker.cancel(Ticket(99));
    assert_eq!(worker.in_flight(), 0);
}

#[test]
fn client_reports_its_credential() {
    let anon = GoogleBooksClient::new(DEFAULT_GOOGLE_BOOKS_URL, None, Duration::from_secs(1));
    assert!(!anon.has_api_key());
    let keyed = GoogleBooksClient::new("http://localhost:1/", Some("k".into()), Duration::from_secs(1));
    assert!(keyed.has_api_key());
}

// ── Google Books over HTTP ───────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_catalog_is_a_network_error() {
    let client = GoogleBooksClient::new("http://127.0.0.1:1", None, Duration::from_secs(5));
    assert!(matches!(client.fetch_random_book().await, Err(CatalogError::Network(_))));
    assert!(matches!(
        client.fetch_cover("http://127.0.0.1:1/cover.jpg").await,
        Err(CatalogError::Network(_))
    ));
}

#[tokio::test]
async fn volumes_search_maps_statuses_and_reads_the_body() {
    let (base, server) = serve(vec![(401, "{}"), (429, "{}"), (200, ONE_VOLUME)]).await;
    let client = GoogleBooksClient::new(&base, Some("secret".into()), Duration::from_secs(5));

    assert_eq!(client.fetch_random_book().await, Err(CatalogError::Auth(401)));
    assert_eq!(client.fetch_random_book().await, Err(CatalogError::RateLimited));
    let book = client.fetch_random_book().await.unwrap();
    assert_eq!(book.title, "The Haunting of Hill House");
    assert_eq!(book.byline().as_deref(), Some("Shirley Jackson"));

    let request_lines = server.await.unwrap();
    assert_eq!(request_lines.len(), 3);
    for line in &request_lines {
        assert!(line.starts_with("GET /books/v1/volumes?q=subject%3A"), "{line}");
        assert!(line.contains("&maxResults=20&printType=books&key=secret "), "{line}");
        assert!(line.ends_with(" HTTP/1.1"), "{line}");
    }
}

#[tokio::test]
async fn cover_download_returns_raw_bytes() {
    let (base, server) = serve(vec![(200, "not-really-a-jpeg"), (404, "")]).await;
    let client = GoogleBooksClient::new(&base, None, Duration::from_secs(5));

    let url = format!("{base}covers/1.jpg");
    assert_eq!(client.fetch_cover(&url).await.unwrap(), b"not-really-a-jpeg".to_vec());
    assert_eq!(client.fetch_cover(&url).await, Err(CatalogError::Http(404)));

    let request_lines = server.await.unwrap();
    assert_eq!(request_lines, vec!["GET /books/v1/covers/1.jpg HTTP/1.1"; 2]);
}
