use std::{collections::HashMap, future::Future};

use tokio::task::JoinHandle;

/// Named background tasks. Spawning under an existing name replaces (and
/// aborts) the previous task; dropping the set aborts everything.
#[derive(Default)]
pub struct TaskSet {
    tasks: HashMap<&'static str, JoinHandle<()>>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(previous) = self.tasks.insert(name, tokio::spawn(task)) {
            previous.abort();
        }
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.tasks.get(name).is_some_and(|handle| !handle.is_finished())
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

impl Drop for TaskSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}
