use crate::dataset::LocationStore;

/// Shared application state. The store is never mutated after load, so
/// request tasks read it concurrently without locking.
pub struct AppState {
    pub store: LocationStore,
}
