//! # Worker Pool
//!
//! The thread manager behind the demo: simulated tile fetches and searches
//! run as tokio tasks and report their progress on [`WorkerPool::events`].
//!
//! Cancelling aborts the task through its `AbortHandle`, but an abort only
//! lands at the job's next `.await`. Each job therefore reports through a
//! live flag under its own lock: `cancel` clears the flag, and once it returns
//! the job sends nothing more, not even `Removed`. The task table drops the
//! entry on its own.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

use crate::core::signal::Signal;
use crate::core::tasks::{ThreadEvent, ThreadManager};

struct Job {
    abort: AbortHandle,
    live: Arc<Mutex<bool>>,
}

#[derive(Default)]
pub struct WorkerPool {
    jobs: Mutex<HashMap<String, Job>>,
    pub events: Signal<ThreadEvent>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a job of `steps` steps, one every `interval`. Must be called
    /// from within a tokio runtime. Returns the job's unique name.
    pub fn spawn_job(self: &Arc<Self>, label: &str, steps: u32, interval: Duration) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("{label}-{}", &id[..8]);
        let label = label.to_string();
        let pool = Arc::clone(self);
        let job_name = name.clone();
        let live = Arc::new(Mutex::new(true));
        let job_live = Arc::clone(&live);

        // Hold the lock across spawn so a fast job can't finish before it
        // is registered.
        let mut jobs = self.lock();
        let handle = tokio::spawn(async move {
            let started = [
                ThreadEvent::StatusChanged(job_name.clone(), Some(format!("{label}: starting"))),
                ThreadEvent::ProgressChanged(job_name.clone(), None),
            ];
            if !pool.report(&job_live, &started) {
                return;
            }
            for step in 1..=steps {
                tokio::time::sleep(interval).await;
                let update = [
                    ThreadEvent::StatusChanged(
                        job_name.clone(),
                        Some(format!("{label}: {step}/{steps}")),
                    ),
                    ThreadEvent::ProgressChanged(
                        job_name.clone(),
                        Some(step as f32 / steps as f32),
                    ),
                ];
                if !pool.report(&job_live, &update) {
                    return;
                }
            }
            pool.finish(&job_name, &job_live);
        });
        jobs.insert(
            name.clone(),
            Job {
                abort: handle.abort_handle(),
                live,
            },
        );
        info!("Spawned job {name}");
        name
    }

    pub fn running(&self) -> usize {
        self.lock().len()
    }

    /// Emit `events` if the job has not been cancelled. Returns whether it
    /// is still live.
    fn report(&self, live: &Mutex<bool>, events: &[ThreadEvent]) -> bool {
        let live = lock_flag(live);
        if *live {
            for event in events {
                self.events.emit(event);
            }
        }
        *live
    }

    fn finish(&self, name: &str, live: &Mutex<bool>) {
        let mut live = lock_flag(live);
        if !*live {
            return;
        }
        *live = false;
        self.lock().remove(name);
        debug!("Job {name} finished");
        self.events.emit(&ThreadEvent::Removed(name.to_string()));
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_flag(live: &Mutex<bool>) -> MutexGuard<'_, bool> {
    live.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ThreadManager for WorkerPool {
    /// Blocks until an in-flight report of the job has been delivered.
    fn cancel(&self, name: &str) -> bool {
        let Some(job) = self.lock().remove(name) else {
            return false;
        };
        *lock_flag(&job.live) = false;
        job.abort.abort();
        info!("Aborted job {name}");
        true
    }
}
