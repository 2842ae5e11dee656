//! Asynchronous writer for the daily mind map.
//!
//! Task commands report state changes through [`MindMap`] and move on; the
//! outline file is updated in the background. Errors end up in the log, never
//! with the caller.

mod noop;
mod updater;

use std::io;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::model::config::MindMapConfig;
use crate::model::event::Status;

pub use noop::NoopUpdater;
pub use updater::{Clock, DEFAULT_QUEUE_CAPACITY, Updater};

/// Producer-facing mind map API. Every mutating call returns without
/// waiting for file I/O.
pub trait MindMap: Send + Sync {
    /// Ensure today's outline exists. The writer resolves "today" itself
    /// when it processes the request; `date` is informational.
    fn initialize_daily_mind_map(&self, date: NaiveDate);

    fn append_task(&self, task_id: &str, title: &str);

    /// Dropped when the parent task is not on today's map
    fn append_subtask(&self, parent_task_id: &str, subtask_id: &str, title: &str);

    /// `Unscheduled` removes the task and its subtasks; other statuses create
    /// the task when missing
    fn update_task_status(&self, task_id: &str, status: Status);

    fn update_subtask_status(&self, parent_task_id: &str, task_id: &str, status: Status);

    /// Apply everything already queued, then shut the writer down.
    /// Blocks until it has exited.
    fn stop(&self);

    /// Events taken off the queue so far, whether or not they succeeded
    fn processed_count(&self) -> u64;
}

/// Build the updater the config asks for
pub fn build_mind_map(config: &MindMapConfig) -> io::Result<Arc<dyn MindMap>> {
    if !config.enabled {
        return Ok(Arc::new(NoopUpdater));
    }
    Ok(Arc::new(Updater::new(
        config.root.clone(),
        config.queue_capacity,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn disabled_config_builds_noop() {
        let config = MindMapConfig {
            enabled: false,
            ..Default::default()
        };
        let mm = build_mind_map(&config).unwrap();
        mm.append_task("A", "A");
        mm.stop();
        assert_eq!(mm.processed_count(), 0);
    }

    #[test]
    fn enabled_config_builds_updater() {
        let tmp = TempDir::new().unwrap();
        let config = MindMapConfig {
            enabled: true,
            root: tmp.path().to_path_buf(),
            queue_capacity: 4,
        };
        let mm = build_mind_map(&config).unwrap();
        mm.append_task("A", "A");
        mm.stop();
        assert_eq!(mm.processed_count(), 1);
    }
}
