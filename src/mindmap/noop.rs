use chrono::NaiveDate;
use tracing::debug;

use super::MindMap;
use crate::model::event::Status;

/// Stand-in used when mind map tracking is disabled: every call is logged
/// and nothing is written.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopUpdater;

impl MindMap for NoopUpdater {
    fn initialize_daily_mind_map(&self, date: NaiveDate) {
        debug!(%date, "mind map disabled, skipping init");
    }

    fn append_task(&self, task_id: &str, _title: &str) {
        debug!(task = task_id, "mind map disabled, skipping task");
    }

    fn append_subtask(&self, parent_task_id: &str, subtask_id: &str, _title: &str) {
        debug!(parent = parent_task_id, task = subtask_id, "mind map disabled, skipping subtask");
    }

    fn update_task_status(&self, task_id: &str, status: Status) {
        debug!(task = task_id, %status, "mind map disabled, skipping status");
    }

    fn update_subtask_status(&self, parent_task_id: &str, task_id: &str, status: Status) {
        debug!(parent = parent_task_id, task = task_id, %status, "mind map disabled, skipping status");
    }

    fn stop(&self) {}

    fn processed_count(&self) -> u64 {
        0
    }
}
