mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{playlist, FakeWeb};
use iptv_crawler::config::CrawlerConfig;
use iptv_crawler::crawler::CrawlOrchestrator;
use iptv_crawler::models::{CrawlMode, CrawlRequest, StreamEntry};
use tokio_util::sync::CancellationToken;

const ROOT: &str = "http://blog.test/2024/free-iptv";
const P1: &str = "http://p1.test/get.php?username=u&password=p&type=m3u";
const P2: &str = "http://p2.test:8080/get.php?username=u&password=p&type=m3u_plus";

fn page_linking(candidates: &[&str]) -> String {
    let mut html = String::from("<html><body><h1>Fresh lists</h1>");
    for candidate in candidates {
        html.push_str(&format!("<p>Server: {candidate}</p>\n"));
    }
    html.push_str("</body></html>");
    html
}

fn orchestrator(web: &Arc<FakeWeb>) -> CrawlOrchestrator {
    CrawlOrchestrator::new(web.clone(), &CrawlerConfig::default())
}

fn url_set(streams: &[StreamEntry]) -> HashSet<String> {
    streams.iter().map(|s| s.url.clone()).collect()
}

#[tokio::test]
async fn test_duplicate_across_candidates_appears_once() {
    let web = FakeWeb::new()
        .page(ROOT, &page_linking(&[P1, P2]))
        .page(
            P1,
            &playlist(&[("News", "http://cdn.test/news"), ("Shared", "http://cdn.test/shared")]),
        )
        .page(
            P2,
            &playlist(&[
                ("Shared too", "http://cdn.test/shared"),
                ("Movies", "http://cdn.test/movies"),
            ]),
        )
        .into_arc();

    let result = orchestrator(&web).crawl(&CrawlRequest::new(ROOT, None)).await;

    assert_eq!(result.mode, CrawlMode::Discovery);
    assert_eq!(result.candidates_found, 2);
    assert_eq!(result.total_streams(), 3);
    assert_eq!(
        url_set(&result.streams),
        HashSet::from([
            "http://cdn.test/news".to_string(),
            "http://cdn.test/shared".to_string(),
            "http://cdn.test/movies".to_string(),
        ])
    );
}

#[tokio::test]
async fn test_direct_endpoint_skips_discovery() {
    let web = FakeWeb::new()
        .page(P1, &playlist(&[("One", "http://cdn.test/1"), ("Two", "http://cdn.test/2")]))
        .into_arc();

    let result = orchestrator(&web).crawl(&CrawlRequest::new(P1, None)).await;

    assert_eq!(result.mode, CrawlMode::Direct);
    assert_eq!(
        result.streams,
        vec![
            StreamEntry::new("One", "http://cdn.test/1"),
            StreamEntry::new("Two", "http://cdn.test/2"),
        ]
    );
    // the endpoint was fetched as a playlist, never as a page to scan
    assert_eq!(web.requests(), vec![P1.to_string()]);
}

#[tokio::test]
async fn test_unreachable_root_yields_empty_result() {
    let web = FakeWeb::new().into_arc();

    let result = orchestrator(&web).crawl(&CrawlRequest::new(ROOT, Some("news".into()))).await;

    assert!(result.is_empty());
    assert_eq!(result.mode, CrawlMode::Discovery);
    assert_eq!(result.candidates_found, 0);
    assert_eq!(result.filter_applied.as_deref(), Some("news"));
    // one attempt per page profile, plain http so no downgrade retries
    assert_eq!(web.request_count(ROOT), 3);
}

#[tokio::test]
async fn test_page_without_candidates_yields_empty_result() {
    let web = FakeWeb::new()
        .page(ROOT, "<html><body><p>Nothing to see</p></body></html>")
        .into_arc();

    let result = orchestrator(&web).crawl(&CrawlRequest::new(ROOT, None)).await;
    assert!(result.is_empty());
    assert_eq!(web.requests(), vec![ROOT.to_string()]);
}

#[tokio::test]
async fn test_failing_candidates_do_not_abort_crawl() {
    let p3 = "http://p3.test/get.php?username=u&password=p&type=m3u";
    let web = FakeWeb::new()
        .page(ROOT, &page_linking(&[P1, P2, p3]))
        .status(P1, 404)
        .page(P2, "<html>Account expired</html>")
        .page(p3, &playlist(&[("Alive", "http://cdn.test/alive")]))
        .into_arc();

    let result = orchestrator(&web).crawl(&CrawlRequest::new(ROOT, None)).await;

    assert_eq!(result.candidates_found, 3);
    assert_eq!(result.streams, vec![StreamEntry::new("Alive", "http://cdn.test/alive")]);
    // the 404 candidate was retried with every playlist profile
    assert_eq!(web.request_count(P1), 3);
    // the non-playlist body was fetched once and rejected
    assert_eq!(web.request_count(P2), 1);
}

#[tokio::test]
async fn test_membership_is_independent_of_completion_order() {
    let build = |slow_first: bool| {
        let (d1, d2) = if slow_first { (80, 0) } else { (0, 80) };
        FakeWeb::new()
            .page(ROOT, &page_linking(&[P1, P2]))
            .slow_page(P1, &playlist(&[("A", "http://cdn.test/a")]), Duration::from_millis(d1))
            .slow_page(P2, &playlist(&[("B", "http://cdn.test/b")]), Duration::from_millis(d2))
            .into_arc()
    };

    let request = CrawlRequest::new(ROOT, None);
    let first = orchestrator(&build(true)).crawl(&request).await;
    let second = orchestrator(&build(false)).crawl(&request).await;

    assert_eq!(url_set(&first.streams), url_set(&second.streams));
    assert_eq!(first.total_streams(), 2);
    // completion order decides the merge order
    assert_eq!(first.streams[0].url, "http://cdn.test/b");
    assert_eq!(second.streams[0].url, "http://cdn.test/a");
}

#[tokio::test]
async fn test_filter_applies_across_candidates() {
    let first = "#EXTM3U\n\
        #EXTINF:-1 group-title=\"News\",CNN\n\
        http://cdn.test/cnn\n\
        \n\n\n\n\
        #EXTINF:-1 group-title=\"Sports\",ESPN\n\
        http://cdn.test/espn\n";
    let second = "#EXTM3U\n\
        #EXTINF:-1 group-title=\"Sports\",Eurosport\n\
        http://cdn2.test/eurosport\n\
        \n\n\n\n\
        #EXTINF:-1 group-title=\"Kids\",Cartoons\n\
        http://cdn2.test/cartoons\n";
    let web = FakeWeb::new()
        .page(ROOT, &page_linking(&[P1, P2]))
        .page(P1, first)
        .page(P2, second)
        .into_arc();

    let result = orchestrator(&web)
        .crawl(&CrawlRequest::new(ROOT, Some("SPORTS".into())))
        .await;

    assert_eq!(result.candidates_found, 2);
    assert_eq!(
        url_set(&result.streams),
        HashSet::from([
            "http://cdn.test/espn".to_string(),
            "http://cdn2.test/eurosport".to_string(),
        ])
    );
    assert!(result
        .streams
        .iter()
        .any(|s| s == &StreamEntry::new("Eurosport", "http://cdn2.test/eurosport")));
    assert_eq!(result.filter_applied.as_deref(), Some("SPORTS"));
}

#[tokio::test]
async fn test_cancelled_before_start_does_no_work() {
    let web = FakeWeb::new().page(ROOT, &page_linking(&[P1])).into_arc();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = orchestrator(&web)
        .crawl_with_cancellation(&CrawlRequest::new(ROOT, None), cancel)
        .await;

    assert!(result.is_empty());
    assert!(web.requests().is_empty());
}

#[tokio::test]
async fn test_cancellation_abandons_in_flight_candidates() {
    let web = FakeWeb::new()
        .page(ROOT, &page_linking(&[P1, P2]))
        .slow_page(P1, &playlist(&[("A", "http://cdn.test/a")]), Duration::from_secs(5))
        .slow_page(P2, &playlist(&[("B", "http://cdn.test/b")]), Duration::from_secs(5))
        .into_arc();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = orchestrator(&web)
        .crawl_with_cancellation(&CrawlRequest::new(ROOT, None), cancel)
        .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(result.candidates_found, 2);
    assert!(result.is_empty());
}
