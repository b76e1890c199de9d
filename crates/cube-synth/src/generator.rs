//! End-to-end generation: configuration and discovery in, full model out.

use std::collections::BTreeSet;
use std::thread;

use cube_config::{AutoCubeConfig, SourceConfig};
use cube_core::{
    CatalogDescription, CubeDescription, DiscoveredSchema, GeneratedModel,
    ManagerDescription, SchemaDescription, SourceBinding, StoreDescription, StoreSpec, Warning,
};
use cube_discovery::SchemaDiscovery;

use crate::customization::{CurrencyCustomization, Customization};
use crate::dimensions::DimensionSynthesizer;
use crate::error::SynthesisError;
use crate::measures::MeasureSynthesizer;
use crate::partitioning::PartitioningSelector;
use crate::record::RecordSchemaSynthesizer;
use crate::registry::CubeDescriptionRegistry;

/// Physical layout and cube inputs produced for one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOutcome {
    pub store: StoreDescription,
    /// Fields the store's cube selects.
    pub selection: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Runs every synthesizer for one store spec.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer {
    selector: PartitioningSelector,
}

impl Synthesizer {
    pub const fn new(parallelism: usize) -> Self {
        Self {
            selector: PartitioningSelector::new(parallelism),
        }
    }

    /// Physical layout only; used for reference data.
    ///
    /// # Errors
    ///
    /// Malformed columns.
    pub fn describe_store(&self, spec: &StoreSpec) -> Result<StoreOutcome, SynthesisError> {
        let choice = self.selector.select(spec);
        let store = RecordSchemaSynthesizer::describe(spec, choice.partitioning)?;
        Ok(StoreOutcome {
            store,
            selection: RecordSchemaSynthesizer::selection_fields(spec.columns()),
            warnings: choice.warning.into_iter().collect(),
        })
    }

    /// Physical layout plus the store's cube, written into `registry`.
    ///
    /// # Errors
    ///
    /// Malformed columns. The cube is left untouched in that case.
    pub fn synthesize(
        &self,
        spec: &StoreSpec,
        registry: &CubeDescriptionRegistry,
    ) -> Result<StoreOutcome, SynthesisError> {
        let outcome = self.describe_store(spec)?;

        let name = spec.store_name.as_str();
        let cube = registry.get_or_create(name);
        registry.set_aggregate_mode(name, spec.aggregate_mode);
        DimensionSynthesizer::synthesize(spec.columns(), &cube);
        MeasureSynthesizer::synthesize(spec.columns(), &cube);
        registry.set_cache_size(name, spec.cache_size);

        cube.with(|description| {
            tracing::info!(
                store = name,
                dimensions = description.dimensions.len(),
                measures = description.measures.len(),
                "synthesized cube"
            );
        });
        Ok(outcome)
    }
}

struct SourceOutcome {
    store: String,
    binding: SourceBinding,
    outcome: StoreOutcome,
}

/// Orchestrates discovery, synthesis and customizations for a whole
/// configuration.
pub struct Generator<D> {
    discovery: D,
    customizations: Vec<Box<dyn Customization>>,
}

impl<D: SchemaDiscovery> Generator<D> {
    pub fn new(discovery: D) -> Self {
        Self {
            discovery,
            customizations: Vec::new(),
        }
    }

    /// A generator with the customizations the configuration enables.
    pub fn from_config(discovery: D, config: &AutoCubeConfig) -> Self {
        let generator = Self::new(discovery);
        match config.customizations.currency_store() {
            Some(store) => generator.with_customization(CurrencyCustomization::new(store)),
            None => generator,
        }
    }

    #[must_use]
    pub fn with_customization(mut self, customization: impl Customization + 'static) -> Self {
        self.customizations.push(Box::new(customization));
        self
    }

    /// Generate the full model.
    ///
    /// Primary sources are discovered and synthesized concurrently, one
    /// worker per source; output order follows the configuration.
    ///
    /// # Errors
    ///
    /// The first discovery or synthesis failure of any source, or
    /// [`SynthesisError::DuplicateStore`] when a reference file's stem
    /// repeats a store name already produced.
    pub fn generate(&self, config: &AutoCubeConfig) -> Result<GeneratedModel, SynthesisError> {
        let (charset, charset_warning) = config.general.resolve_charset();
        let parallelism = config.general.effective_parallelism();
        tracing::info!(parallelism, charset = %charset, "generating schema");

        let synthesizer = Synthesizer::new(parallelism);
        let registry = CubeDescriptionRegistry::new();
        let mut warnings: Vec<Warning> = charset_warning.into_iter().collect();

        let primaries = thread::scope(|scope| {
            let workers: Vec<_> = config
                .sources
                .iter()
                .map(|(store, source)| {
                    let (synthesizer, registry, charset) = (&synthesizer, &registry, &charset);
                    let worker = scope.spawn(move || {
                        self.synthesize_source(store, source, synthesizer, registry, charset)
                    });
                    (store, worker)
                })
                .collect();
            workers
                .into_iter()
                .map(|(store, worker)| {
                    worker
                        .join()
                        .unwrap_or_else(|_| Err(SynthesisError::Worker(store.clone())))
                })
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut defined: BTreeSet<String> =
            primaries.iter().map(|primary| primary.store.clone()).collect();
        let mut references = Vec::new();
        for (group, source) in &config.ref_sources {
            let discovered = self
                .discovery
                .discover_reference(group, source)
                .map_err(|source| SynthesisError::Discovery {
                    store: group.clone(),
                    source,
                })?;
            for schema in discovered {
                if !defined.insert(schema.source_name.clone()) {
                    return Err(SynthesisError::DuplicateStore {
                        store: schema.source_name,
                        group: group.clone(),
                    });
                }
                let spec =
                    StoreSpec::from_discovered(schema.source_name.clone(), &schema, &source.policy())?;
                let outcome = synthesizer.describe_store(&spec)?;
                references.push(SourceOutcome {
                    store: spec.store_name.clone(),
                    binding: binding(&spec.store_name, &schema, &charset),
                    outcome,
                });
            }
        }

        for primary in &primaries {
            self.customize(&primary.store, &registry);
        }

        let mut cubes = registry.into_descriptions();
        let mut model = GeneratedModel::default();
        let mut manager = ManagerDescription::default();
        for primary in primaries {
            let cube = cubes
                .remove(&primary.store)
                .unwrap_or_else(|| CubeDescription::new(primary.store.clone()));
            manager
                .catalogs
                .push(CatalogDescription::for_store(&primary.store));
            manager.schemas.push(SchemaDescription::for_store(
                &primary.store,
                primary.outcome.selection,
                cube,
            ));
            model.datastore.stores.push(primary.outcome.store);
            model.sources.push(primary.binding);
            warnings.extend(primary.outcome.warnings);
        }
        for reference in references {
            model.datastore.stores.push(reference.outcome.store);
            model.sources.push(reference.binding);
            warnings.extend(reference.outcome.warnings);
        }

        model.manager = manager;
        model.warnings = warnings;
        Ok(model)
    }

    fn synthesize_source(
        &self,
        store: &str,
        source: &SourceConfig,
        synthesizer: &Synthesizer,
        registry: &CubeDescriptionRegistry,
        charset: &str,
    ) -> Result<SourceOutcome, SynthesisError> {
        let schema =
            self.discovery
                .discover(store, source)
                .map_err(|source| SynthesisError::Discovery {
                    store: store.to_string(),
                    source,
                })?;
        let spec = StoreSpec::from_discovered(store, &schema, &source.policy())?;
        let outcome = synthesizer.synthesize(&spec, registry)?;
        Ok(SourceOutcome {
            store: store.to_string(),
            binding: binding(store, &schema, charset),
            outcome,
        })
    }

    fn customize(&self, store: &str, registry: &CubeDescriptionRegistry) {
        for customization in &self.customizations {
            if customization.applies_to(store) {
                tracing::debug!(store, customization = customization.name(), "applying customization");
                customization.apply(&registry.get_or_create(store));
            }
        }
    }
}

fn binding(store: &str, schema: &DiscoveredSchema, charset: &str) -> SourceBinding {
    SourceBinding {
        store: store.to_string(),
        separator: schema.separator,
        charset: charset.to_string(),
        origin: schema.origin.clone(),
    }
}

