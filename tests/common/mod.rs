#![allow(dead_code)]

pub mod strategies;

use config_resolver::{Diagnostic, DiagnosticSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Sink that keeps every diagnostic for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    errors: Mutex<Vec<Diagnostic>>,
    debugs: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> Vec<Diagnostic> {
        self.errors.lock().clone()
    }

    pub fn debugs(&self) -> Vec<Diagnostic> {
        self.debugs.lock().clone()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors
            .lock()
            .iter()
            .map(|diagnostic| diagnostic.message.clone())
            .collect()
    }
}

impl DiagnosticSink for RecordingSink {
    fn error(&self, diagnostic: &Diagnostic) {
        self.errors.lock().push(diagnostic.clone());
    }

    fn debug(&self, diagnostic: &Diagnostic) {
        self.debugs.lock().push(diagnostic.clone());
    }
}
