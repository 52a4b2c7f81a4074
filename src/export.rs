use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::canvas::Bitmap;
use crate::error::{EngineError, EngineResult};

struct ExportJob {
    bitmap: Bitmap,
    path: PathBuf,
}

/// Result of one export, reported back to the UI thread
#[derive(Debug)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub result: EngineResult<()>,
}

/// Encodes PNGs on a background thread so the UI never waits on disk I/O.
#[derive(Debug)]
pub struct ExportWorker {
    jobs: Option<Sender<ExportJob>>,
    outcomes: Receiver<ExportOutcome>,
    handle: Option<JoinHandle<()>>,
    pending: usize,
}

impl Default for ExportWorker {
    fn default() -> Self {
        Self::spawn()
    }
}

impl ExportWorker {
    pub fn spawn() -> Self {
        let (job_tx, job_rx) = mpsc::channel::<ExportJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            for job in job_rx {
                let result = write_png(&job.bitmap, &job.path);
                if outcome_tx
                    .send(ExportOutcome {
                        path: job.path,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
            log::debug!("Export worker stopped");
        });

        Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            handle: Some(handle),
            pending: 0,
        }
    }

    /// Queue `bitmap` for writing. `.png` is appended when `path` lacks it.
    pub fn submit(&mut self, bitmap: Bitmap, path: impl AsRef<Path>) -> EngineResult<PathBuf> {
        let path = with_png_extension(path.as_ref());
        let jobs = self.jobs.as_ref().ok_or(EngineError::ExportWorkerGone)?;
        jobs.send(ExportJob {
            bitmap,
            path: path.clone(),
        })
        .map_err(|_| EngineError::ExportWorkerGone)?;
        self.pending += 1;
        log::debug!("Queued export to {}", path.display());
        Ok(path)
    }

    /// Next finished export, if any. Never blocks.
    pub fn poll(&mut self) -> Option<ExportOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => {
                self.pending = self.pending.saturating_sub(1);
                match &outcome.result {
                    Ok(()) => log::info!("Exported {}", outcome.path.display()),
                    Err(err) => log::error!("{err}"),
                }
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.pending > 0 {
                    self.pending = 0;
                    return Some(ExportOutcome {
                        path: PathBuf::new(),
                        result: Err(EngineError::ExportWorkerGone),
                    });
                }
                None
            }
        }
    }

    /// Exports submitted but not yet reported
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Block until every queued export has been written.
    pub fn finish(mut self) -> Vec<ExportOutcome> {
        self.shutdown();
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.poll() {
            outcomes.push(outcome);
        }
        outcomes
    }

    fn shutdown(&mut self) {
        // Closing the job channel ends the worker's loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Export worker panicked");
            }
        }
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn with_png_extension(path: &Path) -> PathBuf {
    let is_png = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_owned();
        name.push(".png");
        PathBuf::from(name)
    }
}

fn write_png(bitmap: &Bitmap, path: &Path) -> EngineResult<()> {
    bitmap
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| EngineError::Export {
            path: path.to_path_buf(),
            source,
        })
}
