use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::{Scheduler, TimerCallback, TimerId};

#[derive(Default)]
struct TaskTable {
    next_id: u64,
    tasks: HashMap<u64, AbortHandle>,
}

/// Real-time scheduler backed by tokio timers.
///
/// Each timer is a `spawn_local` task, so this must be used from inside a
/// [`tokio::task::LocalSet`]. Cancelling aborts the task; dropping the
/// scheduler aborts everything still pending.
pub struct LocalTokioScheduler {
    origin: Instant,
    table: Rc<RefCell<TaskTable>>,
}

impl LocalTokioScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            table: Rc::new(RefCell::new(TaskTable::default())),
        }
    }

    /// Number of timers not yet fired or cancelled
    pub fn pending(&self) -> usize {
        self.table.borrow().tasks.len()
    }
}

impl Default for LocalTokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for LocalTokioScheduler {
    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.origin)
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let id = {
            let mut table = self.table.borrow_mut();
            let id = table.next_id;
            table.next_id += 1;
            id
        };

        let table = Rc::downgrade(&self.table);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let live = table
                .upgrade()
                .map(|t| t.borrow_mut().tasks.remove(&id).is_some())
                .unwrap_or(false);
            if live {
                callback();
            }
        });

        self.table
            .borrow_mut()
            .tasks
            .insert(id, handle.abort_handle());
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) {
        if let Some(handle) = self.table.borrow_mut().tasks.remove(&id.0) {
            handle.abort();
        }
    }
}

impl Drop for LocalTokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.table.borrow_mut().tasks.drain() {
            handle.abort();
        }
    }
}
