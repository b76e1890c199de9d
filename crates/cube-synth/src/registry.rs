//! Registry owning one cube description per store.
//!
//! Creation is atomic per name through the map's entry API, so concurrent
//! callers asking for the same store always end up with the same instance.
//! Synthesizers mutate a cube through its [`CubeHandle`]; once synthesis is
//! over the registry is frozen into plain values and read without locking.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cube_core::{AggregateMode, CubeDescription, DimensionSpec, MeasureSpec, NativeMeasure};
use dashmap::DashMap;

/// Shared handle to one registered cube description.
#[derive(Debug, Clone)]
pub struct CubeHandle(Arc<Mutex<CubeDescription>>);

impl CubeHandle {
    fn new(name: &str) -> Self {
        Self(Arc::new(Mutex::new(CubeDescription::new(name))))
    }

    fn lock(&self) -> MutexGuard<'_, CubeDescription> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles point at the same description.
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&CubeDescription) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut CubeDescription) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn add_dimension(&self, dimension: DimensionSpec) {
        self.update(|cube| cube.add_dimension(dimension));
    }

    pub fn add_measure(&self, measure: impl Into<MeasureSpec>) {
        let measure = measure.into();
        self.update(|cube| cube.add_measure(measure));
    }

    pub fn snapshot(&self) -> CubeDescription {
        self.lock().clone()
    }

    fn into_description(self) -> CubeDescription {
        match Arc::try_unwrap(self.0) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared.lock().unwrap_or_else(PoisonError::into_inner).clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CubeDescriptionRegistry {
    cubes: DashMap<String, CubeHandle>,
}

impl CubeDescriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The existing description for `store`, or a fresh empty one.
    ///
    /// Never resets what earlier passes appended.
    pub fn get_or_create(&self, store: &str) -> CubeHandle {
        if let Some(handle) = self.cubes.get(store) {
            return handle.clone();
        }
        self.cubes
            .entry(store.to_string())
            .or_insert_with(|| {
                tracing::debug!(store, "creating cube description");
                CubeHandle::new(store)
            })
            .clone()
    }

    pub fn get(&self, store: &str) -> Option<CubeHandle> {
        self.cubes.get(store).map(|handle| handle.clone())
    }

    /// Attach a query-result cache. `None` is a no-op.
    pub fn set_cache_size(&self, store: &str, size: Option<u32>) {
        let Some(size) = size else {
            return;
        };
        tracing::info!(store, size, "configuring aggregates cache");
        self.get_or_create(store)
            .update(|cube| cube.set_cache_size(Some(size)));
    }

    pub fn set_aggregate_mode(&self, store: &str, mode: AggregateMode) {
        self.get_or_create(store)
            .update(|cube| cube.set_aggregate_mode(mode));
    }

    pub fn dimensions(&self, store: &str) -> Vec<DimensionSpec> {
        self.get_or_create(store).with(|cube| cube.dimensions.clone())
    }

    pub fn measures(&self, store: &str) -> Vec<MeasureSpec> {
        self.get_or_create(store).with(|cube| cube.measures.clone())
    }

    pub fn native_measures(&self, store: &str) -> Vec<NativeMeasure> {
        self.get_or_create(store)
            .with(|cube| cube.native_measures().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    /// Freeze the registry into plain descriptions keyed by store name.
    pub fn into_descriptions(self) -> BTreeMap<String, CubeDescription> {
        self.cubes
            .into_iter()
            .map(|(name, handle)| (name, handle.into_description()))
            .collect()
    }
}
