use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvError};
use std::thread::JoinHandle;

use super::index::{self, ScanReport};
use super::walker::ScanOptions;

/// Events emitted by a background duplicate scan
#[derive(Debug)]
pub enum ScanEvent {
    /// Periodic progress: percentage of the (ceiling-capped) total and
    /// the path currently being hashed
    Progress { percent: u8, path: PathBuf },
    /// Terminal event carrying the final report
    Done(ScanReport),
}

/// Handle to a scan running on a dedicated worker thread.
///
/// One scan per handle; the caller's thread never blocks on the walk or
/// hashing work. Dropping the handle abandons the scan (best-effort
/// cancellation: the worker finishes its walk but nobody listens).
#[derive(Debug)]
pub struct ScanHandle {
    events: Receiver<ScanEvent>,
    worker: Option<JoinHandle<()>>,
}

impl ScanHandle {
    /// Receive the next event, blocking until one arrives
    pub fn recv(&self) -> Result<ScanEvent, RecvError> {
        self.events.recv()
    }

    /// Iterate events until the channel closes
    pub fn events(&self) -> impl Iterator<Item = ScanEvent> + '_ {
        self.events.iter()
    }

    /// Drain all events and return the final report.
    /// Returns `None` if the worker died without completing.
    pub fn wait(mut self) -> Option<ScanReport> {
        let mut report = None;
        for event in self.events.iter() {
            if let ScanEvent::Done(r) = event {
                report = Some(r);
            }
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        report
    }
}

/// Run a duplicate scan on a dedicated background thread, returning a
/// handle whose channel carries progress events and the final report.
pub fn spawn_scan(root: PathBuf, options: ScanOptions) -> ScanHandle {
    let (tx, rx) = std::sync::mpsc::channel();

    let worker = std::thread::spawn(move || {
        let progress_tx = tx.clone();
        let report = index::scan(&root, &options, |percent, path| {
            // Receiver may be gone (scan abandoned); keep walking regardless
            let _ = progress_tx.send(ScanEvent::Progress {
                percent,
                path: path.to_path_buf(),
            });
        });
        let _ = tx.send(ScanEvent::Done(report));
    });

    ScanHandle {
        events: rx,
        worker: Some(worker),
    }
}
