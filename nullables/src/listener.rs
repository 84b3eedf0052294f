//! Load listener that counts spinner notifications.

use govdash_balance::LoadListener;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct RecordingListener {
    started: AtomicUsize,
    completed: AtomicUsize,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl LoadListener for RecordingListener {
    fn load_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn load_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}
