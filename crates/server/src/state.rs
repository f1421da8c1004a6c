use std::sync::OnceLock;

use headway::dataset::Dataset;

/// The one piece of shared state: the dataset pointer, written exactly
/// once when the load completes. Handlers that run before installation
/// observe `None` and answer "not ready".
#[derive(Default)]
pub struct AppState {
    dataset: OnceLock<Dataset>,
}

impl AppState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn install(&self, dataset: Dataset) {
        let _ = self.dataset.set(dataset);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.get()
    }
}
