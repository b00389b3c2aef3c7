use std::sync::Arc;

use crate::stores::CodeStore;

#[derive(Clone)]
pub struct AppState {
    /// Pending code deliveries.
    pub store: Arc<dyn CodeStore>,
}
