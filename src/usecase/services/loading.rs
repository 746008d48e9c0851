use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::usecase::ports::view::ViewEvents;

/// Loading affordance shared by the gate and the query controller. Repeated
/// starts or clears emit nothing.
pub struct LoadingIndicator {
    events: Arc<dyn ViewEvents>,
    active: AtomicBool,
}

impl LoadingIndicator {
    pub fn new(events: Arc<dyn ViewEvents>) -> Self {
        Self {
            events,
            active: AtomicBool::new(false),
        }
    }

    pub fn start(&self) {
        if !self.active.swap(true, Ordering::SeqCst) {
            self.events.on_loading_start();
        }
    }

    pub fn done(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.events.on_loading_done();
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
