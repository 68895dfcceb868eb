//! Deployment pipeline: authenticate once, upload task after task

mod credentials;
mod ftp;
mod pacing;
mod session;

pub use credentials::{Credentials, DEFAULT_FTP_PORT};
pub use ftp::FtpSession;
pub use pacing::{NoPacing, Pacer, SleepPacer};
pub use session::{remote_parent, remote_path, TransferSession};

use crate::scanner::{enumerate, relative_to};
use crate::types::{DeployMode, SiteKitError, UploadTask};
use crate::ui::{ProgressBarReporter, UploadProgress};
use tracing::{error, info};

/// Environment lookup used to resolve credentials
pub type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Outcome of a successful deploy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Tasks that uploaded at least one file.
    pub tasks_uploaded: usize,
    /// Tasks skipped because nothing matched.
    pub tasks_empty: usize,
    /// Total files uploaded.
    pub files_uploaded: usize,
}

/// Runs one deployment over an exclusively owned session.
///
/// The session, progress reporter and pacing hook are injected so the
/// sequencing can be exercised without a network or a terminal.
pub struct Deployer<S, P> {
    session: S,
    progress: P,
    progress_active: bool,
    pacer: Box<dyn Pacer>,
    env: EnvLookup,
}

impl Deployer<FtpSession, ProgressBarReporter> {
    /// FTPS session, terminal progress bars and the default settle delay.
    pub fn ftp() -> Self {
        Self::new(FtpSession::new(), ProgressBarReporter::new())
    }
}

impl<S, P> Deployer<S, P>
where
    S: TransferSession,
    P: UploadProgress,
{
    pub fn new(session: S, progress: P) -> Self {
        Self {
            session,
            progress,
            progress_active: false,
            pacer: Box::new(SleepPacer::default()),
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the pause run after each task's progress bar is stopped
    pub fn with_pacer(mut self, pacer: impl Pacer + 'static) -> Self {
        self.pacer = Box::new(pacer);
        self
    }

    /// Replace the environment lookup used for `FTP_*_<MODE>` variables
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.env = Box::new(lookup);
        self
    }

    /// Upload every task to the target selected by `mode`.
    ///
    /// Tasks run strictly one after another, files in sorted order. A task
    /// without matching files is logged and skipped. The first error stops
    /// the run: an active progress bar is stopped, the error is logged, and
    /// files uploaded so far stay on the remote.
    ///
    /// The session is closed exactly once, whatever the outcome, before this
    /// returns.
    pub fn run_deploy(
        mut self,
        mode: DeployMode,
        tasks: &[UploadTask],
    ) -> Result<DeployReport, SiteKitError> {
        info!("Starting deployment for: {}", mode.env_suffix());

        let result = self.upload_all(mode, tasks);

        match &result {
            Ok(report) => info!(
                "Deployment completed successfully! {} file(s) in {} task(s)",
                report.files_uploaded, report.tasks_uploaded
            ),
            Err(e) => {
                if self.progress_active {
                    self.progress.stop();
                    self.progress_active = false;
                }
                error!("Deployment failed: {}", e);
            }
        }

        self.session.close();
        result
    }

    fn upload_all(
        &mut self,
        mode: DeployMode,
        tasks: &[UploadTask],
    ) -> Result<DeployReport, SiteKitError> {
        let credentials = Credentials::resolve(mode, &self.env)?;
        self.session.connect(&credentials).map_err(|e| match e {
            SiteKitError::Authentication(_) => e,
            other => SiteKitError::Authentication(other.to_string()),
        })?;

        let mut report = DeployReport::default();
        for task in tasks {
            info!("Processing task: {}", task.name);

            let files = enumerate(&task.local_pattern, &task.ignore)?;
            if files.is_empty() {
                info!("No files found for this task.");
                report.tasks_empty += 1;
                continue;
            }

            self.progress.start(&task.name, files.len() as u64);
            self.progress_active = true;

            for file in &files {
                let relative = relative_to(file, &task.local_base)?;
                let target = remote_path(&task.remote_dir, &relative);

                self.session.ensure_dir(remote_parent(&target))?;
                self.session.upload(file, &target)?;

                self.progress.increment();
                report.files_uploaded += 1;
            }

            self.progress.stop();
            self.progress_active = false;
            self.pacer.settle();

            report.tasks_uploaded += 1;
        }

        Ok(report)
    }
}
