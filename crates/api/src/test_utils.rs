//! Shared test utilities for API handler tests.
//!
//! Provides a `TestStateBuilder` for constructing `AppState` instances with
//! only the mocks a test actually needs.

use std::sync::Arc;

use crate::state::AppState;
use crate::stores::{CodeStore, MockCodeStore};

/// Builder for constructing test `AppState` with a custom mock store.
///
/// Uses a default (empty) mock when none is set, so tests only configure
/// the expectations they actually need.
pub struct TestStateBuilder {
    store: Option<MockCodeStore>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self { store: None }
    }

    pub fn with_store(mut self, store: MockCodeStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the `AppState` using the configured mock or a default.
    pub fn build(self) -> AppState {
        let store =
            Arc::new(self.store.unwrap_or_else(MockCodeStore::new)) as Arc<dyn CodeStore>;

        AppState { store }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
