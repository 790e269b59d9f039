use std::io::Write;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::calculator::{fixed_leverage, RiskInputs};
use crate::catalogue::{
    Catalogue, CatalogueError, CatalogueProfile, LoadOutcome, LoadState, Loader, LoaderOptions,
    QueryState, RawRecord, Session, SortKey, Source,
};
use crate::output::report::render_listing_html;
use crate::render::{card_template, escape_html, render_grid, HostPage};

fn raw(json: &str) -> Vec<RawRecord> {
    serde_json::from_str(json).unwrap()
}

fn named(names: &[&str]) -> Vec<RawRecord> {
    names
        .iter()
        .map(|n| RawRecord {
            name: Some(n.to_string()),
            ..RawRecord::default()
        })
        .collect()
}

fn names(records: &[&crate::catalogue::CatalogueRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

fn projects(count: usize) -> Catalogue {
    let raw = (0..count)
        .map(|i| RawRecord {
            name: Some(format!("Project {i}")),
            status: Some("published".to_string()),
            ..RawRecord::default()
        })
        .collect();
    Catalogue::from_raw(CatalogueProfile::projects(), raw)
}

#[test]
fn query_is_idempotent() {
    let cat = Catalogue::from_raw(
        CatalogueProfile::projects(),
        raw(r#"[
            {"name": "Ethereum", "symbol": "ETH", "marketCap": 400},
            {"name": "Bitcoin", "symbol": "BTC", "marketCap": 1200},
            {"name": "Tether", "symbol": "USDT"},
            {"name": "Draft coin", "status": "draft"}
        ]"#),
    );
    let mut state = QueryState::new(SortKey::Rank);
    state.text = "e".to_string();
    let once = cat.query(&state);
    let owned: Vec<_> = once.iter().map(|r| (*r).clone()).collect();
    let twice = crate::catalogue::query(&owned, &state, cat.profile());
    assert_eq!(names(&once), names(&twice));
}

#[test]
fn empty_query_keeps_visible_records_in_load_order() {
    let cat = Catalogue::from_raw(
        CatalogueProfile::projects(),
        raw(r#"[
            {"name": "C", "status": "published"},
            {"name": "A", "status": "draft"},
            {"name": "B"}
        ]"#),
    );
    let out = cat.query(&QueryState::default());
    assert_eq!(names(&out), vec!["C", "B"]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let cat = Catalogue::from_raw(CatalogueProfile::projects(), named(&["Ethereum", "Bitcoin"]));
    let mut state = QueryState::default();
    state.text = "  THER ".to_string();
    assert_eq!(names(&cat.query(&state)), vec!["Ethereum"]);
}

#[test]
fn alphabetical_sort_ignores_case() {
    let cat = Catalogue::from_raw(CatalogueProfile::projects(), named(&["btc", "ADA", "eth"]));
    let state = QueryState::new(SortKey::Alphabetical);
    assert_eq!(names(&cat.query(&state)), vec!["ADA", "btc", "eth"]);
}

#[test]
fn alphabetical_sort_folds_accents_and_keeps_ties_stable() {
    let cat = Catalogue::from_raw(CatalogueProfile::projects(), named(&["Zcash", "Élan", "ada"]));
    let state = QueryState::new(SortKey::Alphabetical);
    assert_eq!(names(&cat.query(&state)), vec!["ada", "Élan", "Zcash"]);

    let cat = Catalogue::from_raw(CatalogueProfile::projects(), named(&["b", "A", "a", "B"]));
    assert_eq!(names(&cat.query(&state)), vec!["A", "a", "b", "B"]);
}

#[test]
fn twenty_five_items_make_three_pages() {
    let mut session = Session::with_catalogue(projects(25));
    assert_eq!(session.total_pages(), 3);
    session.select_page(3);
    let view = session.view();
    assert_eq!(view.page.page, 3);
    assert_eq!(view.page.items.len(), 1);

    session.select_page(99);
    assert_eq!(session.view().page.page, 3);
}

#[test]
fn category_change_returns_to_first_page() {
    let mut raw = Vec::new();
    for i in 0..30 {
        raw.push(RawRecord {
            name: Some(format!("P{i}")),
            categories: Some(vec![if i % 2 == 0 { "DeFi" } else { "Layer 1" }.to_string()]),
            ..RawRecord::default()
        });
    }
    let mut session = Session::with_catalogue(Catalogue::from_raw(CatalogueProfile::projects(), raw));
    session.select_page(3);
    assert_eq!(session.state().page, 3);
    session.set_category(Some("DeFi"));
    assert_eq!(session.state().page, 1);
    assert_eq!(session.view().page.total_items, 15);
}

#[test]
fn markup_in_records_is_escaped() {
    let cat = Catalogue::from_raw(
        CatalogueProfile::projects(),
        raw(r#"[{"name": "<img src=x onerror=alert(1)>", "description": "a & b"}]"#),
    );
    let state = QueryState::default();
    let items = cat.query(&state);
    let html = render_grid(&items, card_template(cat.profile().kind).as_ref(), "none");
    assert!(!html.contains("<img src=x"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(html.contains("a &amp; b"));
    assert_eq!(escape_html("<img src=x onerror=alert(1)>"), "&lt;img src=x onerror=alert(1)&gt;");
}

#[test]
fn leverage_worked_example() {
    let inputs = RiskInputs::parse("1000", 2.0, 5.0).unwrap();
    let r = fixed_leverage(&inputs, 10.0).unwrap();
    assert!((r.risk_per_trade - 20.0).abs() < 1e-9);
    assert!((r.margin - 40.0).abs() < 1e-9);
    assert!((r.position_size - 400.0).abs() < 1e-9);
    assert!(fixed_leverage(&inputs, 0.0).is_err());
}

#[test]
fn empty_catalogue_renders_empty_state() {
    let session = Session::with_catalogue(Catalogue::empty(CatalogueProfile::projects()));
    let view = session.view();
    assert_eq!(view.page.total_pages, 1);
    assert!(view.page.items.is_empty());
    let html = render_listing_html(&session, None);
    assert!(html.contains("No projects match your search."));
    assert!(!html.contains("data-page="));
}

#[test]
fn stale_load_is_ignored() {
    let mut session = Session::new(CatalogueProfile::projects());
    let first = session.begin_load();
    let second = session.begin_load();
    assert_eq!(session.finish_load(second, Ok(named(&["new"]))), LoadOutcome::Applied { records: 1 });
    assert_eq!(session.finish_load(first, Ok(named(&["old", "older"]))), LoadOutcome::Stale);
    assert_eq!(session.catalogue().len(), 1);
    assert_eq!(session.catalogue().records()[0].name, "new");
}

#[test]
fn failed_load_renders_placeholder() {
    let mut session = Session::new(CatalogueProfile::coins());
    let ticket = session.begin_load();
    let outcome = session.finish_load(
        ticket,
        Err(CatalogueError::Status {
            url: "http://localhost/coins.json".to_string(),
            status: 500,
        }),
    );
    assert_eq!(outcome, LoadOutcome::Failed);
    assert!(matches!(session.load_state(), LoadState::Failed(_)));
    let html = render_listing_html(&session, None);
    assert!(html.contains("Failed to load analysis."));
}

#[test]
fn template_without_pagination_slot_still_renders() {
    let session = Session::with_catalogue(projects(30));
    let html = render_listing_html(&session, Some("<div><!-- slot:grid --></div>"));
    assert!(html.contains("Project 0"));
    assert!(!html.contains("data-page"));

    let mut page = HostPage::parse("<div></div>");
    assert!(!page.fill("grid", "x"));
    assert_eq!(page.render(), "<div></div>");
}

#[test]
fn normalizer_fills_defaults() {
    let cat = Catalogue::from_raw(CatalogueProfile::projects(), raw(r#"[{"name": "Render Network"}]"#));
    let r = &cat.records()[0];
    assert_eq!(r.slug, "render-network");
    assert_eq!(r.id, "render-network");
    assert_eq!(r.media, "../assets/default-logo.png");
    assert_eq!(r.link, "./render-network.html");
    assert_eq!(r.market_cap, None);
    assert!(r.categories.is_empty());
    assert!(r.tags.is_empty());
}

#[test]
fn rank_sort_puts_unknown_market_cap_last() {
    let cat = Catalogue::from_raw(
        CatalogueProfile::projects(),
        raw(r#"[{"name": "A"}, {"name": "B", "marketCap": 10}, {"name": "C", "marketCap": 30}]"#),
    );
    let state = QueryState::new(SortKey::Rank);
    assert_eq!(names(&cat.query(&state)), vec!["C", "B", "A"]);
}

/// One-shot HTTP responder. The receiver yields the raw request it was sent.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    (format!("http://{}/data/catalogue.json", addr), rx)
}

fn loader() -> Loader {
    Loader::new(&LoaderOptions {
        timeout_seconds: 5,
        ..LoaderOptions::default()
    })
    .unwrap()
}

#[tokio::test]
async fn loader_reads_array_body() {
    let (url, _) = serve_once("200 OK", r#"[{"name": "Bitcoin"}, {"name": "Ethereum"}]"#).await;
    let records = loader().load(&Source::parse(&url).unwrap(), None).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn loader_requests_bypass_caches() {
    let (url, request) = serve_once("200 OK", "[]").await;
    loader().load(&Source::parse(&url).unwrap(), None).await.unwrap();
    let request = request.await.unwrap().to_lowercase();
    assert!(request.starts_with("get /data/catalogue.json "));
    assert!(request.contains("cache-control: no-store, no-cache\r\n"));
    assert!(request.contains("pragma: no-cache\r\n"));
}

#[tokio::test]
async fn loader_unwraps_posts_key() {
    let (url, _) = serve_once("200 OK", r#"{"posts": [{"title": "BTC wave 3"}], "generated": "now"}"#).await;
    let records = loader()
        .load(&Source::parse(&url).unwrap(), Some("posts"))
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("BTC wave 3"));
}

#[tokio::test]
async fn loader_reports_http_status() {
    let (url, _) = serve_once("404 Not Found", "{}").await;
    let err = loader().load(&Source::parse(&url).unwrap(), None).await.unwrap_err();
    assert!(matches!(err, CatalogueError::Status { status: 404, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn loader_reports_malformed_json() {
    let (url, _) = serve_once("200 OK", "[{\"name\": ").await;
    let err = loader().load(&Source::parse(&url).unwrap(), None).await.unwrap_err();
    assert!(matches!(err, CatalogueError::Parse { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn loader_reads_local_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"name": "Solana", "status": "published"}}, 42]"#).unwrap();
    let source = Source::parse(file.path().to_str().unwrap()).unwrap();
    let records = loader().load(&source, None).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn loader_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = Source::parse(dir.path().join("missing.json").to_str().unwrap()).unwrap();
    let err = loader().load(&source, None).await.unwrap_err();
    assert!(matches!(err, CatalogueError::Read { .. }));
}

#[tokio::test]
async fn wave_listing_reads_bare_array_and_links_by_url() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"title": "SOL wave 3", "category": "Solana", "excerpt": "Impulse", "date": "2025-01-05", "author": "Desk", "url": "/wave/sol.html"}}]"#
    )
    .unwrap();
    let source = Source::parse(file.path().to_str().unwrap()).unwrap();
    let profile = CatalogueProfile::waves();
    let raw = loader()
        .load(&source, profile.collection_key.as_deref())
        .await
        .unwrap();
    let mut session = Session::new(profile);
    let ticket = session.begin_load();
    session.finish_load(ticket, Ok(raw));
    let html = render_listing_html(&session, None);
    assert!(html.contains(r#"<div class="kicker">Solana</div>"#));
    assert!(html.contains(r#"href="/wave/sol.html""#));
    assert!(html.contains("Desk"));
}
