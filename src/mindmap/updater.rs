use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

use chrono::{Local, NaiveDate};
use crossbeam_channel::{Receiver, Sender, bounded, select};
use tracing::{debug, error, info, warn};

use super::MindMap;
use crate::io::outline_store::OutlineStore;
use crate::model::event::{Event, EventKind, Status};
use crate::ops::outline_ops::apply_event;

/// Source of "today" for the writer
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Default queue size between producers and the writer
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// The single-writer mind map engine.
///
/// Producers on any thread enqueue events; one background thread applies
/// them in arrival order to today's outline file. That thread is the only
/// one that touches the files, so the files need no locking.
///
/// Enqueueing blocks only while the queue is full. Once [`stop`] has begun,
/// enqueues are dropped with a warning instead.
///
/// [`stop`]: MindMap::stop
pub struct Updater {
    /// Taken on stop; dropping it lets the writer finish the queue and exit
    sender: RwLock<Option<Sender<Event>>>,
    closed: AtomicBool,
    /// Dropped on stop to wake producers blocked on a full queue
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,
    processed: Arc<AtomicU64>,
    worker: Mutex<Option<JoinHandle<()>>>,
    clock: Clock,
}

impl Updater {
    /// Start an updater writing under `root`, resolving today from the local clock
    pub fn new(root: impl Into<PathBuf>, queue_capacity: usize) -> io::Result<Self> {
        Self::with_clock(root, queue_capacity, Arc::new(|| Local::now().date_naive()))
    }

    /// Start an updater with an explicit clock
    pub fn with_clock(
        root: impl Into<PathBuf>,
        queue_capacity: usize,
        clock: Clock,
    ) -> io::Result<Self> {
        let (tx, rx) = bounded(queue_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = bounded(0);
        let processed = Arc::new(AtomicU64::new(0));

        let worker = Worker {
            store: OutlineStore::new(root),
            clock: Arc::clone(&clock),
            processed_dates: HashSet::new(),
            processed: Arc::clone(&processed),
        };
        let handle = thread::Builder::new()
            .name("mindmap-updater".into())
            .spawn(move || worker.run(rx))?;

        Ok(Updater {
            sender: RwLock::new(Some(tx)),
            closed: AtomicBool::new(false),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            processed,
            worker: Mutex::new(Some(handle)),
            clock,
        })
    }

    fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    fn enqueue(&self, event: Event) {
        if self.closed.load(Ordering::Acquire) {
            warn!(kind = ?event.kind(), task = event.task_id(), "mind map updater stopped, event dropped");
            return;
        }

        let guard = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        let Some(tx) = guard.as_ref() else {
            warn!(kind = ?event.kind(), task = event.task_id(), "mind map updater stopped, event dropped");
            return;
        };

        let kind = event.kind();
        select! {
            send(tx, event) -> res => {
                if res.is_err() {
                    warn!(kind = ?kind, "mind map queue closed, event dropped");
                }
            }
            recv(self.shutdown_rx) -> _ => {
                warn!(kind = ?kind, "mind map updater shutting down, event dropped");
            }
        }
    }
}

impl MindMap for Updater {
    fn initialize_daily_mind_map(&self, date: NaiveDate) {
        self.enqueue(Event::init(date));
    }

    fn append_task(&self, task_id: &str, title: &str) {
        self.enqueue(Event::append_task(task_id, title, self.today()));
    }

    fn append_subtask(&self, parent_task_id: &str, subtask_id: &str, title: &str) {
        self.enqueue(Event::append_subtask(
            parent_task_id,
            subtask_id,
            title,
            self.today(),
        ));
    }

    fn update_task_status(&self, task_id: &str, status: Status) {
        self.enqueue(Event::update_status(None, task_id, status, self.today()));
    }

    fn update_subtask_status(&self, parent_task_id: &str, task_id: &str, status: Status) {
        self.enqueue(Event::update_status(
            Some(parent_task_id),
            task_id,
            status,
            self.today(),
        ));
    }

    fn stop(&self) {
        self.closed.store(true, Ordering::Release);
        drop(
            self.shutdown_tx
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        drop(
            self.sender
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );

        // The guard is held across the join, so a concurrent caller waits
        // here until the writer has exited rather than returning early.
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = worker.take()
            && handle.join().is_err()
        {
            error!("mind map updater thread panicked");
        }
    }

    fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::Acquire)
    }
}

impl Drop for Updater {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Writer thread
// ---------------------------------------------------------------------------

struct Worker {
    store: OutlineStore,
    clock: Clock,
    /// Days whose file is known to exist
    processed_dates: HashSet<NaiveDate>,
    processed: Arc<AtomicU64>,
}

impl Worker {
    /// Apply events until every sender is gone and the queue is empty
    fn run(mut self, rx: Receiver<Event>) {
        info!(root = %self.store.root().display(), "mind map updater started");
        for event in rx.iter() {
            self.handle(&event);
            self.processed.fetch_add(1, Ordering::AcqRel);
        }
        info!(
            processed = self.processed.load(Ordering::Acquire),
            "mind map updater stopped"
        );
    }

    fn handle(&mut self, event: &Event) {
        // The file is always today's, whatever date the producer saw
        let today = (self.clock)();
        debug!(
            kind = ?event.kind(),
            task = event.task_id(),
            event_date = %event.date(),
            %today,
            "applying mind map event"
        );

        if !self.ensure_exists(today) || event.kind() == EventKind::Init {
            return;
        }

        let mut lines = match self.store.read_lines(today) {
            Ok(lines) => lines,
            Err(e) => {
                error!(error = %e, kind = ?event.kind(), "mind map update aborted");
                return;
            }
        };

        let outcome = apply_event(&mut lines, event);
        if !outcome.is_changed() {
            debug!(?outcome, kind = ?event.kind(), task = event.task_id(), "mind map unchanged");
            return;
        }
        if let Err(e) = self.store.write_lines(today, &lines) {
            error!(error = %e, kind = ?event.kind(), "mind map update lost");
        }
    }

    /// Make sure today's file exists, creating the skeleton if needed.
    /// The creation write is retried once.
    fn ensure_exists(&mut self, date: NaiveDate) -> bool {
        if self.processed_dates.contains(&date) {
            return true;
        }
        if let Err(e) = self.store.ensure_root() {
            error!(error = %e, "mind map directory unavailable");
            return false;
        }
        if self.store.exists(date) {
            self.processed_dates.insert(date);
            return true;
        }

        let created = self.store.create(date).or_else(|e| {
            warn!(error = %e, "creating mind map file failed, retrying");
            self.store.create(date)
        });
        match created {
            Ok(()) => {
                info!(path = %self.store.path_for(date).display(), "created daily mind map");
                self.processed_dates.insert(date);
                true
            }
            Err(e) => {
                error!(error = %e, "could not create daily mind map");
                false
            }
        }
    }
}
