//! Download tests against mocked archive file servers.
//!
//! Run with: cargo test --test download_tests

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use linecat::{Archives, CatalogEntry, DownloadManager, EntryStatus, ProgressChannel};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager_for(server: &MockServer) -> (DownloadManager, ProgressChannel) {
    let archives = Archives::new(
        format!("{}/cdms/", server.uri()),
        format!("{}/jpl/", server.uri()),
    );
    let progress = ProgressChannel::new();
    let manager = DownloadManager::new(reqwest::Client::new(), archives, progress.clone());
    (manager, progress)
}

fn selected(tag: u32, name: &str) -> Arc<CatalogEntry> {
    let entry = Arc::new(CatalogEntry::new(tag, name));
    entry.set_selected(true);
    entry
}

async fn serve(server: &MockServer, file_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_write_failure_does_not_stop_batch() {
    let server = MockServer::start().await;
    serve(&server, "/cdms/c028503.cat", "CO lines").await;
    serve(&server, "/jpl/c018003.cat", "H2O lines").await;
    serve(&server, "/cdms/c045130.cat", "HCS+ lines").await;

    let dest = TempDir::new().unwrap();
    // A directory where the second file should go makes its write fail.
    fs::create_dir(dest.path().join("c018003.cat")).unwrap();

    let view = vec![
        selected(28503, "CO"),
        selected(18003, "H2O"),
        selected(45130, "HCS+"),
    ];
    let (manager, progress) = manager_for(&server);
    let summary = manager.download_selected(&view, dest.path()).await;

    assert_eq!(summary.names(), vec!["CO", "H2O", "HCS+"]);
    assert_eq!(summary.failure_count(), 1);
    assert!(matches!(summary.outcomes[1].status, EntryStatus::Failed { ref error } if error.contains("Failed to write")));

    assert_eq!(fs::read_to_string(dest.path().join("c028503.cat")).unwrap(), "CO lines");
    assert!(!dest.path().join("c018003.cat").is_file());
    assert_eq!(fs::read_to_string(dest.path().join("c045130.cat")).unwrap(), "HCS+ lines");
    assert!(progress.is_idle());
}

#[tokio::test]
async fn test_http_error_records_failure_and_leaves_no_file() {
    let server = MockServer::start().await;
    serve(&server, "/cdms/c028503.cat", "CO lines").await;
    Mock::given(method("GET"))
        .and(path("/jpl/c018003.cat"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let view = vec![selected(18003, "H2O"), selected(28503, "CO")];
    let (manager, _progress) = manager_for(&server);
    let summary = manager.download_selected(&view, dest.path()).await;

    assert_eq!(summary.names(), vec!["H2O", "CO"]);
    match &summary.outcomes[0].status {
        EntryStatus::Failed { error } => assert!(error.contains("404"), "error was: {}", error),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(summary.outcomes[1].status, EntryStatus::Succeeded { bytes: 8 });
    assert!(!dest.path().join("c018003.cat").exists());
    assert!(dest.path().join("c028503.cat").is_file());
}

#[tokio::test]
async fn test_only_selected_entries_are_fetched_from_their_archive() {
    let server = MockServer::start().await;
    serve(&server, "/jpl/c045030.cat", "H2CS lines").await;
    Mock::given(method("GET"))
        .and(path("/cdms/c045030.cat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdms/c028503.cat"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let view = vec![
        Arc::new(CatalogEntry::new(28503, "CO")),
        selected(45030, "H2CS"),
    ];
    let (manager, _progress) = manager_for(&server);
    let summary = manager.download_selected(&view, dest.path()).await;

    assert_eq!(summary.names(), vec!["H2CS"]);
    assert!(summary.all_succeeded());
    assert_eq!(
        summary.outcomes[0].url,
        format!("{}/jpl/c045030.cat", server.uri())
    );
}

#[tokio::test]
async fn test_existing_file_is_overwritten() {
    let server = MockServer::start().await;
    serve(&server, "/cdms/c028503.cat", "new").await;

    let dest = TempDir::new().unwrap();
    fs::write(dest.path().join("c028503.cat"), "old content that is longer").unwrap();

    let (manager, _progress) = manager_for(&server);
    let summary = manager
        .download_selected(&[selected(28503, "CO")], dest.path())
        .await;

    assert!(summary.all_succeeded());
    assert_eq!(fs::read_to_string(dest.path().join("c028503.cat")).unwrap(), "new");
}

#[tokio::test]
async fn test_spawn_reads_selection_at_trigger_time() {
    let server = MockServer::start().await;
    serve(&server, "/cdms/c028503.cat", "CO lines").await;

    let dest = TempDir::new().unwrap();
    let co = selected(28503, "CO");
    let h2o = Arc::new(CatalogEntry::new(18003, "H2O"));
    let view = vec![Arc::clone(&co), Arc::clone(&h2o)];

    let (manager, _progress) = manager_for(&server);
    let handle = manager.spawn(&view, dest.path().to_path_buf());
    // Edits after the trigger do not change the run.
    co.set_selected(false);
    h2o.set_selected(true);

    let summary = handle.await.unwrap();
    assert_eq!(summary.names(), vec!["CO"]);
    assert!(dest.path().join("c028503.cat").is_file());
    assert!(!dest.path().join("c018003.cat").exists());
}

#[tokio::test]
async fn test_missing_destination_is_created() {
    let server = MockServer::start().await;
    serve(&server, "/cdms/c028503.cat", "CO lines").await;

    let root = TempDir::new().unwrap();
    let dest = root.path().join("catalogs").join("cdms");

    let (manager, _progress) = manager_for(&server);
    let summary = manager
        .download_selected(&[selected(28503, "CO")], &dest)
        .await;

    assert!(summary.all_succeeded());
    assert!(dest.join("c028503.cat").is_file());
}

#[tokio::test]
async fn test_progress_names_url_while_transfer_runs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdms/c028503.cat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("CO lines")
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dest = TempDir::new().unwrap();
    let (manager, progress) = manager_for(&server);
    let handle = manager.spawn(&[selected(28503, "CO")], dest.path().to_path_buf());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(
        progress.current(),
        format!("Downloading {}/cdms/c028503.cat ...", server.uri())
    );

    let summary = handle.await.unwrap();
    assert_eq!(summary.names(), vec!["CO"]);
    assert!(progress.is_idle());
}
