use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard};

use crate::{
    config::AppConfig,
    dao::palette_store::PaletteStore,
    engine::{extractor::ImagePaletteExtractor, model::PreferenceModel, search::CandidateSearch},
    error::ServiceError,
};

/// Handle passed to every route and service.
pub type SharedState = Arc<AppState>;

/// Model together with the corpus size it was fitted on; always swapped as a unit.
#[derive(Debug, Clone, Default)]
pub struct PreferenceSnapshot {
    /// Current classifier, possibly untrained.
    pub model: PreferenceModel,
    /// Well-formed feedback records seen by the last retrain.
    pub usable_feedback: usize,
}

/// Central application state storing the store handle and the preference model.
pub struct AppState {
    config: AppConfig,
    palette_store: RwLock<Option<Arc<dyn PaletteStore>>>,
    preferences: RwLock<PreferenceSnapshot>,
    retrain_gate: Mutex<()>,
    degraded: AtomicBool,
    extractor: ImagePaletteExtractor,
    search: CandidateSearch,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            extractor: ImagePaletteExtractor::new(config.extractor.clone()),
            search: config.candidate_search(),
            config,
            palette_store: RwLock::new(None),
            preferences: RwLock::new(PreferenceSnapshot::default()),
            retrain_gate: Mutex::new(()),
            degraded: AtomicBool::new(true),
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Extractor built from the configured tunables.
    pub fn extractor(&self) -> &ImagePaletteExtractor {
        &self.extractor
    }

    /// Candidate search built from the configured budget and gate.
    pub fn search(&self) -> &CandidateSearch {
        &self.search
    }

    /// Obtain a handle to the current palette store, if one is installed.
    pub async fn palette_store(&self) -> Option<Arc<dyn PaletteStore>> {
        let guard = self.palette_store.read().await;
        guard.as_ref().cloned()
    }

    /// Store handle, or [`ServiceError::Degraded`] while none is installed.
    pub async fn require_palette_store(&self) -> Result<Arc<dyn PaletteStore>, ServiceError> {
        self.palette_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new palette store implementation and leave degraded mode.
    pub async fn install_palette_store(&self, store: Arc<dyn PaletteStore>) {
        {
            let mut guard = self.palette_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current palette store and enter degraded mode.
    pub async fn clear_palette_store(&self) {
        {
            let mut guard = self.palette_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Acquire)
    }

    /// Set the degraded flag; returns whether it changed.
    pub fn update_degraded(&self, value: bool) -> bool {
        self.degraded.swap(value, Ordering::AcqRel) != value
    }

    /// Read access to the current model snapshot.
    pub async fn preferences(&self) -> RwLockReadGuard<'_, PreferenceSnapshot> {
        self.preferences.read().await
    }

    /// Swap in a freshly fitted snapshot.
    pub async fn install_preferences(&self, snapshot: PreferenceSnapshot) {
        *self.preferences.write().await = snapshot;
    }

    /// Serialises retrains so an older corpus never overwrites a newer model.
    pub async fn retrain_gate(&self) -> MutexGuard<'_, ()> {
        self.retrain_gate.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::palette_store::memory::MemoryPaletteStore;

    #[tokio::test]
    async fn starts_degraded_until_store_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded());
        assert!(matches!(
            state.require_palette_store().await,
            Err(ServiceError::Degraded)
        ));

        state
            .install_palette_store(Arc::new(MemoryPaletteStore::new()))
            .await;
        assert!(!state.is_degraded());
        assert!(!state.update_degraded(false));

        state.clear_palette_store().await;
        assert!(state.is_degraded());
    }

    #[tokio::test]
    async fn starts_with_untrained_model() {
        let state = AppState::new(AppConfig::default());
        let snapshot = state.preferences().await;
        assert!(!snapshot.model.is_trained());
        assert_eq!(snapshot.usable_feedback, 0);
    }
}
