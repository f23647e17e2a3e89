use super::*;
use crate::checksum::md5_hex;
use crate::fetch::fake::MapFetcher;
use crate::fetch::FetchError;
use crate::sources::HtmlDetailParser;

const BODY: &[u8] = b"ID3 not really an mp3";

fn config() -> SyncConfig {
    SyncConfig {
        item_page_url: "http://site.test/remix/OCR{id}".to_string(),
        ..SyncConfig::default()
    }
}

fn id(n: u32) -> ItemId {
    ItemId::new(n).unwrap()
}

fn page(hash: Option<&str>, mirrors: &[&str]) -> String {
    let mut html = String::from("<html><body><ul>");
    if let Some(h) = hash {
        html.push_str(&format!("<li><strong>MD5 Checksum: </strong>{h}</li>"));
    }
    html.push_str("</ul>");
    for m in mirrors {
        html.push_str(&format!(r#"<a href="{m}">Download from {m}</a>"#));
    }
    html.push_str("</body></html>");
    html
}

fn executor(fetcher: MapFetcher, dir: &std::path::Path) -> (ItemExecutor, Arc<HostLoadTracker>) {
    let tracker = Arc::new(HostLoadTracker::new());
    let exec = ItemExecutor::new(
        Arc::new(fetcher),
        Arc::new(HtmlDetailParser),
        Arc::clone(&tracker),
        config(),
        dir,
    )
    .with_seed(7);
    (exec, tracker)
}

#[test]
fn verified_download_is_saved_without_log() {
    let dir = tempfile::tempdir().unwrap();
    let hash = md5_hex(BODY);
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00011",
            page(Some(hash.as_str()), &["http://a.test/files/Song%20A.mp3"]),
        )
        .ok("http://a.test/files/Song%20A.mp3", BODY);
    let (exec, tracker) = executor(fetcher, dir.path());

    let report = exec.execute(id(11)).unwrap();
    assert_eq!(
        report.outcome,
        DownloadOutcome::Success {
            filename: "Song A.mp3".into()
        }
    );
    assert_eq!(std::fs::read(dir.path().join("Song A.mp3")).unwrap(), BODY);
    assert!(!failure_log_path(dir.path(), id(11)).exists());
    let s = tracker.get("a.test").unwrap();
    assert_eq!((s.active, s.completed), (0, 1));
}

#[test]
fn failing_mirror_falls_over_to_next() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00011",
            page(
                Some(md5_hex(BODY).as_str()),
                &["http://down.test/s.mp3", "http://up.test/s.mp3"],
            ),
        )
        .err(
            "http://down.test/s.mp3",
            FetchError::Transport("connection refused".into()),
        )
        .ok("http://up.test/s.mp3", BODY);
    let (exec, _) = executor(fetcher, dir.path());

    let report = exec.execute(id(11)).unwrap();
    assert!(report.outcome.is_success());
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with("http://down.test/s.mp3"));
    assert!(dir.path().join("s.mp3").exists());
    assert!(!failure_log_path(dir.path(), id(11)).exists());
}

#[test]
fn no_reference_means_first_2xx_wins() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00003",
            page(None, &["http://a.test/x.mp3"]),
        )
        .ok("http://a.test/x.mp3", b"anything".to_vec());
    let (exec, _) = executor(fetcher, dir.path());

    let report = exec.execute(id(3)).unwrap();
    assert!(report.outcome.is_success());
    assert_eq!(std::fs::read(dir.path().join("x.mp3")).unwrap(), b"anything");
}

#[test]
fn every_mismatch_is_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let expected = md5_hex(b"the real thing");
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00004",
            page(Some(expected.as_str()), &["http://a.test/x.mp3", "http://b.test/x.mp3"]),
        )
        .ok("http://a.test/x.mp3", b"corrupt a".to_vec())
        .ok("http://b.test/x.mp3", b"corrupt b".to_vec());
    let (exec, _) = executor(fetcher, dir.path());

    let report = exec.execute(id(4)).unwrap();
    assert_eq!(report.outcome, DownloadOutcome::AllMirrorsFailed);
    assert!(!dir.path().join("x.mp3").exists());

    let log = std::fs::read_to_string(failure_log_path(dir.path(), id(4))).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "2 mirrors found on http://site.test/remix/OCR00004 (a.test, b.test)"
    );
    assert!(log.contains(&md5_hex(b"corrupt a")));
    assert!(log.contains(&md5_hex(b"corrupt b")));
    assert!(lines[1..].iter().all(|l| l.contains(&expected)));
}

#[test]
fn page_without_mirrors_fails_with_log() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = MapFetcher::new().ok("http://site.test/remix/OCR00010", page(None, &[]));
    let (exec, _) = executor(fetcher, dir.path());

    let report = exec.execute(id(10)).unwrap();
    assert_eq!(report.outcome, DownloadOutcome::AllMirrorsFailed);
    assert!(failure_log_path(dir.path(), id(10)).exists());
}

#[test]
fn missing_page_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (exec, _) = executor(MapFetcher::new(), dir.path());

    let report = exec.execute(id(12)).unwrap();
    assert_eq!(report.outcome, DownloadOutcome::PageUnavailable);
    let log = std::fs::read_to_string(failure_log_path(dir.path(), id(12))).unwrap();
    assert!(log.contains("HTTP 404"), "{log}");
}

#[test]
fn content_write_failure_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-created");
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00001",
            page(None, &["http://a.test/x.mp3"]),
        )
        .ok("http://a.test/x.mp3", BODY);
    let (exec, _) = executor(fetcher, &missing);

    assert!(exec.execute(id(1)).is_err());
}

#[test]
fn progress_lines_reach_the_channel() {
    let dir = tempfile::tempdir().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let fetcher = MapFetcher::new()
        .ok(
            "http://site.test/remix/OCR00002",
            page(None, &["http://a.test/x.mp3"]),
        )
        .ok("http://a.test/x.mp3", BODY);
    let (exec, _) = executor(fetcher, dir.path());
    let exec = exec.with_reporter(Reporter::new(tx));

    exec.execute(id(2)).unwrap();
    drop(exec);
    let mut lines = Vec::new();
    while let Ok(e) = rx.try_recv() {
        lines.push(e.to_string());
    }
    assert_eq!(lines.last().unwrap(), "2 OK: http://a.test/x.mp3");
    assert!(lines.iter().any(|l| l.contains("no MD5 checksum")));
}
