//! Mock host integrations for testing

use curfew_api::Confirmation;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{CacheFlusher, Confirmer, FlushBackend, HostError, HostResult};

/// Cache flusher that records calls instead of running anything
#[derive(Debug, Default)]
pub struct MockCacheFlusher {
    flushes: Mutex<usize>,

    /// Configure flush to fail
    pub fail: Mutex<bool>,
}

impl MockCacheFlusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            flushes: Mutex::new(0),
            fail: Mutex::new(true),
        }
    }

    /// Number of flush attempts so far
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheFlusher for MockCacheFlusher {
    fn backend(&self) -> FlushBackend {
        FlushBackend::None
    }

    fn flush(&self) -> HostResult<()> {
        *self.flushes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(HostError::FlushFailed {
                backend: self.backend(),
                message: "Mock flush failure".into(),
            });
        }
        Ok(())
    }
}

/// Confirmer that replays a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedConfirmer {
    answers: Mutex<VecDeque<Confirmation>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmer {
    pub fn new(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Confirmer for ScriptedConfirmer {
    fn confirm(&self, prompt: &str, _preview: Option<&str>) -> HostResult<Confirmation> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        self.answers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .ok_or_else(|| HostError::PromptFailed("No scripted answer left".into()))
    }
}
