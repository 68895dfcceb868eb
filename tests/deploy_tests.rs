//! Deploy run sequencing, teardown and failure handling against an in-memory
//! transfer session.

use sitekit::deploy::{Credentials, Deployer, NoPacing, Pacer, TransferSession};
use sitekit::ui::UploadProgress;
use sitekit::{DeployMode, SiteKitError, UploadTask};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type Journal = Arc<Mutex<Vec<String>>>;

fn record(journal: &Journal, entry: String) {
    journal.lock().expect("lock journal").push(entry);
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().expect("lock journal").clone()
}

#[derive(Default)]
struct FakeSession {
    journal: Journal,
    reject_login: bool,
    fail_upload_containing: Option<String>,
}

impl TransferSession for FakeSession {
    fn connect(&mut self, credentials: &Credentials) -> Result<(), SiteKitError> {
        record(&self.journal, format!("connect {}", credentials.address()));
        if self.reject_login {
            return Err(SiteKitError::Authentication("530 Login incorrect".to_string()));
        }
        Ok(())
    }

    fn ensure_dir(&mut self, remote_dir: &str) -> Result<(), SiteKitError> {
        record(&self.journal, format!("mkdir {}", remote_dir));
        Ok(())
    }

    fn upload(&mut self, local: &Path, remote_path: &str) -> Result<(), SiteKitError> {
        if let Some(needle) = &self.fail_upload_containing {
            if remote_path.contains(needle.as_str()) {
                return Err(SiteKitError::transfer(local, "451 Local error"));
            }
        }
        record(&self.journal, format!("upload {}", remote_path));
        Ok(())
    }

    fn close(&mut self) {
        record(&self.journal, "close".to_string());
    }
}

struct FakeProgress {
    journal: Journal,
}

impl UploadProgress for FakeProgress {
    fn start(&mut self, task: &str, total: u64) {
        record(&self.journal, format!("start {} {}", task, total));
    }

    fn increment(&mut self) {
        record(&self.journal, "inc".to_string());
    }

    fn stop(&mut self) {
        record(&self.journal, "stop".to_string());
    }
}

struct CountingPacer(Arc<AtomicUsize>);

impl Pacer for CountingPacer {
    fn settle(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn staging_env(key: &str) -> Option<String> {
    match key {
        "FTP_HOST_STAGING" => Some("stage.example.com".to_string()),
        "FTP_USER_STAGING" => Some("deploy".to_string()),
        "FTP_PASSWORD_STAGING" => Some("hunter2".to_string()),
        _ => None,
    }
}

fn deployer(session: FakeSession, journal: &Journal) -> Deployer<FakeSession, FakeProgress> {
    Deployer::new(
        session,
        FakeProgress {
            journal: Arc::clone(journal),
        },
    )
    .with_pacer(NoPacing)
    .with_env(staging_env)
}

/// dist/{css,js,img} fixture; img is left empty
fn build_output(root: &Path) {
    fs::create_dir_all(root.join("dist/css")).expect("create css");
    fs::create_dir_all(root.join("dist/js/vendor")).expect("create js");
    fs::create_dir_all(root.join("dist/img")).expect("create img");
    fs::write(root.join("dist/css/site.css"), b"body{}").expect("write css");
    fs::write(root.join("dist/css/site.css.map"), b"{}").expect("write map");
    fs::write(root.join("dist/js/app.js"), b"go()").expect("write js");
    fs::write(root.join("dist/js/vendor/lib.js"), b"lib()").expect("write vendor");
}

fn upload_task(root: &Path, name: &str, remote_dir: &str) -> UploadTask {
    let base = root.join("dist").join(name);
    UploadTask::new(
        name,
        format!("{}/**/*", glob::Pattern::escape(&base.display().to_string())),
        base,
        remote_dir,
    )
}

fn count(entries: &[String], prefix: &str) -> usize {
    entries.iter().filter(|e| e.starts_with(prefix)).count()
}

#[test]
fn test_tasks_run_in_order_with_one_progress_bar_each() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        ..FakeSession::default()
    };
    let tasks = [
        upload_task(root, "css", "/www/css").with_ignore(["**/*.map"]),
        upload_task(root, "js", "/www/js"),
    ];

    let report = deployer(session, &journal)
        .run_deploy(DeployMode::Staging, &tasks)
        .expect("deploy");

    assert_eq!(report.tasks_uploaded, 2);
    assert_eq!(report.files_uploaded, 3);
    assert_eq!(
        entries(&journal),
        vec![
            "connect stage.example.com:21",
            "start css 1",
            "mkdir /www/css",
            "upload /www/css/site.css",
            "inc",
            "stop",
            "start js 2",
            "mkdir /www/js",
            "upload /www/js/app.js",
            "inc",
            "mkdir /www/js/vendor",
            "upload /www/js/vendor/lib.js",
            "inc",
            "stop",
            "close",
        ]
    );
}

#[test]
fn test_empty_task_is_skipped_without_progress_or_uploads() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        ..FakeSession::default()
    };
    let tasks = [
        upload_task(root, "img", "/www/img"),
        upload_task(root, "css", "/www/css"),
    ];

    let report = deployer(session, &journal)
        .run_deploy(DeployMode::Staging, &tasks)
        .expect("deploy");

    let log = entries(&journal);
    assert_eq!(report.tasks_empty, 1);
    assert_eq!(report.tasks_uploaded, 1);
    assert!(!log.iter().any(|e| e.contains("/www/img")));
    assert_eq!(count(&log, "start"), 1);
    assert!(log.contains(&"start css 2".to_string()));
}

#[test]
fn test_pacer_runs_once_per_finished_task() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let settled = Arc::new(AtomicUsize::new(0));
    let session = FakeSession {
        journal: Arc::clone(&journal),
        ..FakeSession::default()
    };
    let tasks = [
        upload_task(root, "css", "/www/css"),
        upload_task(root, "img", "/www/img"),
        upload_task(root, "js", "/www/js"),
    ];

    deployer(session, &journal)
        .with_pacer(CountingPacer(Arc::clone(&settled)))
        .run_deploy(DeployMode::Staging, &tasks)
        .expect("deploy");

    assert_eq!(settled.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rejected_login_uploads_nothing_and_closes_once() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        reject_login: true,
        ..FakeSession::default()
    };

    let err = deployer(session, &journal)
        .run_deploy(DeployMode::Staging, &[upload_task(root, "css", "/www/css")])
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert_eq!(
        entries(&journal),
        vec!["connect stage.example.com:21", "close"]
    );
}

#[test]
fn test_missing_credentials_still_close_session() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        ..FakeSession::default()
    };

    // Only staging variables exist
    let err = deployer(session, &journal)
        .run_deploy(DeployMode::Production, &[upload_task(root, "css", "/www/css")])
        .unwrap_err();

    assert!(err.is_authentication_error());
    assert!(err.to_string().contains("FTP_HOST_PRODUCTION"));
    assert_eq!(entries(&journal), vec!["close"]);
}

#[test]
fn test_upload_failure_stops_progress_and_keeps_earlier_uploads() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        fail_upload_containing: Some("vendor".to_string()),
        ..FakeSession::default()
    };
    let tasks = [
        upload_task(root, "css", "/www/css"),
        upload_task(root, "js", "/www/js"),
        upload_task(root, "css", "/www/css-copy"),
    ];

    let err = deployer(session, &journal)
        .run_deploy(DeployMode::Staging, &tasks)
        .unwrap_err();

    let log = entries(&journal);
    assert!(err.is_transfer_error());
    assert!(log.contains(&"upload /www/css/site.css".to_string()));
    assert!(log.contains(&"upload /www/js/app.js".to_string()));
    assert!(
        !log.iter().any(|e| e.contains("/www/css-copy")),
        "tasks after the failure must not start"
    );
    assert_eq!(count(&log, "start"), count(&log, "stop"));
    assert_eq!(log.iter().filter(|e| *e == "close").count(), 1);
    assert_eq!(log.last().map(String::as_str), Some("close"));
}

#[test]
fn test_invalid_ignore_pattern_aborts_and_closes() {
    let temp = TempDir::new().expect("create tempdir");
    let root = temp.path();
    build_output(root);

    let journal = Journal::default();
    let session = FakeSession {
        journal: Arc::clone(&journal),
        ..FakeSession::default()
    };
    let tasks = [upload_task(root, "css", "/www/css").with_ignore(["[oops"])];

    let err = deployer(session, &journal)
        .run_deploy(DeployMode::Staging, &tasks)
        .unwrap_err();

    assert!(err.is_configuration_error());
    assert_eq!(
        entries(&journal),
        vec!["connect stage.example.com:21", "close"]
    );
}
