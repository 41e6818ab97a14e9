//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: seed, workers, frontier, output.

use sumi_branch::config::{Config, OutputConfig, OutputFormat};
use sumi_branch::crawler::{crawl, Coordinator, Link};
use sumi_branch::output::{build_tree, render};
use sumi_branch::state::{PageState, SkipReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the given seed
fn create_test_config(seed: &str, max_depth: u32, workers: u32, scan_foreign: bool) -> Config {
    let mut config = Config::default();
    config.crawler.seed_url = seed.to_string();
    config.crawler.max_depth = max_depth;
    config.crawler.workers = workers;
    config.crawler.scan_foreign = scan_foreign;
    config.http.user_agent = "TestBot/1.0".to_string();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

fn compact_tree() -> OutputConfig {
    OutputConfig {
        format: OutputFormat::Tree,
        pretty: false,
    }
}

/// Mounts an HTML page containing the given hrefs
async fn mount_page(server: &MockServer, page: &str, hrefs: &[&str], expected_fetches: u64) {
    let body: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();

    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!("<html><body>{}</body></html>", body))
                .insert_header("content-type", "text/html"),
        )
        .expect(expected_fetches)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_depth_one_records_but_does_not_fetch_children() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", &["/a", "http://other.test/b", "/a"], 1).await;
    mount_page(&mock_server, "/a", &[], 0).await;

    let outcome = crawl(create_test_config(&seed, 1, 1, false))
        .await
        .expect("Crawl failed");
    let snapshot = &outcome.snapshot;

    let root = snapshot.root();
    assert_eq!(root.url.as_str(), seed);
    assert_eq!(root.links.len(), 3);
    assert!(root.links[0].is_child());
    assert!(root.links[1].is_child());
    assert_eq!(root.links[2], Link::Reference(root.links[0].target()));

    assert_eq!(snapshot.len(), 3);
    let a = snapshot.find(&format!("{}a", seed)).expect("page /a missing");
    assert_eq!(a.depth, 1);
    assert_eq!(a.skip, Some(SkipReason::DepthLimit));
    assert!(snapshot.find("http://other.test/b").is_some());

    let tree = build_tree(snapshot);
    assert_eq!(tree.links.len(), 3);
    assert!(tree.links.iter().all(|node| node.depth == 1 && node.links.is_empty()));
}

#[tokio::test]
async fn test_self_link_creates_no_duplicate() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", &["/", "#top", "/x#frag"], 1).await;
    mount_page(&mock_server, "/x", &["/x", "/"], 1).await;

    let outcome = crawl(create_test_config(&seed, 3, 2, false))
        .await
        .expect("Crawl failed");

    // Fragments are stripped, so "#top" is the seed again
    assert_eq!(outcome.snapshot.len(), 2);
    let root = outcome.snapshot.root();
    assert_eq!(root.links[0], Link::Reference(0));
    assert_eq!(root.links[1], Link::Reference(0));
    assert!(root.links[2].is_child());

    let x = outcome
        .snapshot
        .find(&format!("{}x", seed))
        .expect("page /x missing");
    assert!(x.links.iter().all(|link| !link.is_child()));
}

#[tokio::test]
async fn test_failed_seed_still_renders() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = crawl(create_test_config(&seed, 1, 2, false))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.snapshot.root().state, PageState::Scanned);
    assert!(outcome.snapshot.root().links.is_empty());

    let json = render(&outcome.snapshot, &compact_tree()).unwrap();
    assert_eq!(
        json,
        format!(r#"{{"url":"{}","depth":0,"links":[]}}"#, seed)
    );
}

#[tokio::test]
async fn test_malformed_link_dropped_crawl_continues() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", &["http://", "/ok"], 1).await;
    mount_page(&mock_server, "/ok", &[], 1).await;

    let outcome = crawl(create_test_config(&seed, 2, 1, false))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.snapshot.len(), 2);
    assert_eq!(outcome.snapshot.root().links.len(), 1);
    assert_eq!(outcome.stats.malformed_links, 1);
    assert!(outcome
        .snapshot
        .find(&format!("{}ok", seed))
        .expect("page /ok missing")
        .was_fetched());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_workers_fetch_each_page_once() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    // Densely cross-linked site; every page must be requested exactly once
    mount_page(&mock_server, "/", &["/p1", "/p2", "/p3", "/p4"], 1).await;
    mount_page(&mock_server, "/p1", &["/p2", "/p11", "/p12", "/"], 1).await;
    mount_page(&mock_server, "/p2", &["/p1", "/p21", "/p22"], 1).await;
    mount_page(&mock_server, "/p3", &["/p31", "/p11", "/p4"], 1).await;
    mount_page(&mock_server, "/p4", &["/p41", "/p3"], 1).await;
    for leaf in ["/p11", "/p12", "/p21", "/p22", "/p31", "/p41"] {
        mount_page(&mock_server, leaf, &["/p1", "/deep"], 1).await;
    }
    mount_page(&mock_server, "/deep", &[], 0).await;

    let outcome = crawl(create_test_config(&seed, 3, 6, false))
        .await
        .expect("Crawl failed");

    // root, p1-p4, six leaves, deep
    assert_eq!(outcome.snapshot.len(), 12);
    assert_eq!(outcome.stats.pages_fetched, 11);
    assert_eq!(outcome.stats.skipped(SkipReason::DepthLimit), 1);
    assert!(outcome
        .snapshot
        .pages()
        .iter()
        .all(|page| page.state == PageState::Scanned));
    for page in outcome.snapshot.pages() {
        assert!(page.depth <= 3);
        if page.was_fetched() {
            assert!(page.depth < 3);
        }
    }
}

#[tokio::test]
async fn test_foreign_host_recorded_not_scanned() {
    let home = MockServer::start().await;
    let foreign = MockServer::start().await;
    let seed = format!("{}/", home.uri());
    let foreign_page = format!("{}/page", foreign.uri());

    mount_page(&home, "/", &[foreign_page.as_str(), "/local"], 1).await;
    mount_page(&home, "/local", &[], 1).await;
    mount_page(&foreign, "/page", &["/more"], 0).await;

    let outcome = crawl(create_test_config(&seed, 3, 2, false))
        .await
        .expect("Crawl failed");

    let page = outcome
        .snapshot
        .find(&foreign_page)
        .expect("foreign page missing");
    assert_eq!(page.skip, Some(SkipReason::OffHost));
    assert!(page.links.is_empty());
    assert_eq!(outcome.stats.skipped(SkipReason::OffHost), 1);
}

#[tokio::test]
async fn test_foreign_host_scanned_when_enabled() {
    let home = MockServer::start().await;
    let foreign = MockServer::start().await;
    let seed = format!("{}/", home.uri());
    let foreign_page = format!("{}/page", foreign.uri());

    mount_page(&home, "/", &[foreign_page.as_str()], 1).await;
    mount_page(&foreign, "/page", &["/more"], 1).await;
    mount_page(&foreign, "/more", &[], 0).await;

    let outcome = crawl(create_test_config(&seed, 2, 2, true))
        .await
        .expect("Crawl failed");

    let page = outcome
        .snapshot
        .find(&foreign_page)
        .expect("foreign page missing");
    assert!(page.was_fetched());
    assert_eq!(page.links.len(), 1);

    // Depth bound still applies across hosts
    let more = outcome
        .snapshot
        .find(&format!("{}/more", foreign.uri()))
        .expect("page /more missing");
    assert_eq!(more.depth, 2);
    assert_eq!(more.skip, Some(SkipReason::DepthLimit));
}

#[tokio::test]
async fn test_url_list_output() {
    let mock_server = MockServer::start().await;
    let seed = format!("{}/", mock_server.uri());

    mount_page(&mock_server, "/", &["/b", "/a", "mailto:someone@example.com"], 1).await;
    mount_page(&mock_server, "/a", &[], 1).await;
    mount_page(&mock_server, "/b", &["/a"], 1).await;

    let mut config = create_test_config(&seed, 2, 1, false);
    config.output.format = OutputFormat::Urls;
    config.output.pretty = false;
    let output_config = config.output.clone();

    let outcome = crawl(config).await.expect("Crawl failed");
    let json = render(&outcome.snapshot, &output_config).unwrap();

    assert_eq!(
        json,
        format!(
            r#"["{0}","{0}b","{0}a","mailto:someone@example.com"]"#,
            seed
        )
    );
    assert_eq!(
        outcome
            .snapshot
            .find("mailto:someone@example.com")
            .and_then(|page| page.skip),
        Some(SkipReason::UnsupportedScheme)
    );
}

#[tokio::test]
async fn test_unreachable_seed_host() {
    // Bind and drop a listener to get a port nothing is listening on
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let seed = format!("http://127.0.0.1:{}/", port);

    let outcome = crawl(create_test_config(&seed, 2, 2, false))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.snapshot.len(), 1);
    assert_eq!(outcome.stats.pages_fetched, 1);
    assert!(outcome.snapshot.root().links.is_empty());
}

#[test]
fn test_invalid_seed_is_rejected() {
    let result = Coordinator::new(create_test_config("ftp://example.com/", 1, 1, false));
    assert!(result.is_err());
}
