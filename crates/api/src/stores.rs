//! Code storage.
//!
//! The relay keeps a single table: pending code deliveries keyed by
//! recipient identity, mirrored to a flat JSON file after every mutation.
//! The store is abstracted behind a trait so handlers can be tested against
//! a mock.
//!
//! ## Usage in Handlers
//!
//! The store is accessed via `state.store`:
//!
//! ```ignore
//! async fn handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
//!     let codes = state.store.fetch_for(&identity).await?;
//! }
//! ```

mod codes;

pub use codes::{CodeStore, FileCodeStore};

#[cfg(test)]
pub use codes::MockCodeStore;
