//! Tile type catalogue.
//!
//! # Responsibilities
//! - Hold the process-wide catalogue of tile types and dynamic generators
//! - Let providers declare variants at startup and enable them with a
//!   params schema plus a route template or builder
//! - Answer the pipeline's lookups: metadata by type, declared variants,
//!   registered generator types
//!
//! # Design Decisions
//! - Immutable after startup; shared as `Arc<TileRegistry>` with no locking
//! - Tiles and generators live in disjoint maps; generator keys carry the
//!   `GENERATE:` prefix so lookup dispatches on the authored type string
//! - Registration mistakes (duplicate type, undeclared variant) are
//!   programmer errors and panic at startup

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::config::schema::{GeneratedTile, TileType, VariantName};
use crate::config::version::ConfigVersion;
use crate::params::ParamsSchema;
use crate::params::ParamsValues;

/// Error returned by a generator builder.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The upstream call exceeded its deadline; the hydrate stage falls
    /// back to the generator result cache on this variant only.
    #[error("generator deadline exceeded")]
    Timeout,

    #[error("generator failed: {0}")]
    Failed(String),
}

/// Future returned by a generator builder.
pub type TileBuilderFuture =
    Pin<Box<dyn Future<Output = Result<Vec<GeneratedTile>, GeneratorError>> + Send>>;

/// Callback expanding a generator tile into concrete tiles.
pub type TileBuilder = Arc<dyn Fn(ParamsValues) -> TileBuilderFuture + Send + Sync>;

/// One enabled or declared variant of a normal tile type.
pub struct TileVariant {
    enabled: bool,
    schema: Option<Arc<ParamsSchema>>,
    route: Option<String>,
}

impl TileVariant {
    fn declared() -> Self {
        Self {
            enabled: false,
            schema: None,
            route: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn schema(&self) -> Option<&ParamsSchema> {
        self.schema.as_deref()
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }
}

/// One enabled or declared variant of a generator type.
pub struct GeneratorVariant {
    enabled: bool,
    schema: Option<Arc<ParamsSchema>>,
    builder: Option<TileBuilder>,
}

impl GeneratorVariant {
    fn declared() -> Self {
        Self {
            enabled: false,
            schema: None,
            builder: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn schema(&self) -> Option<&ParamsSchema> {
        self.schema.as_deref()
    }

    pub fn builder(&self) -> Option<&TileBuilder> {
        self.builder.as_ref()
    }
}

/// Registry entry for a normal tile type.
pub struct TileMetadata {
    minimal_version: ConfigVersion,
    variants: HashMap<VariantName, TileVariant>,
}

impl TileMetadata {
    pub fn minimal_version(&self) -> ConfigVersion {
        self.minimal_version
    }

    pub fn variant(&self, name: &VariantName) -> Option<&TileVariant> {
        self.variants.get(name)
    }

    pub fn declared_variants(&self) -> Vec<&VariantName> {
        let mut names: Vec<_> = self.variants.keys().collect();
        names.sort();
        names
    }
}

/// Registry entry for a generator type.
pub struct GeneratorMetadata {
    minimal_version: ConfigVersion,
    variants: HashMap<VariantName, GeneratorVariant>,
}

impl GeneratorMetadata {
    pub fn minimal_version(&self) -> ConfigVersion {
        self.minimal_version
    }

    pub fn variant(&self, name: &VariantName) -> Option<&GeneratorVariant> {
        self.variants.get(name)
    }

    pub fn declared_variants(&self) -> Vec<&VariantName> {
        let mut names: Vec<_> = self.variants.keys().collect();
        names.sort();
        names
    }
}

/// Uniform view over tile and generator metadata, used by Verify.
pub enum RegistryEntry<'a> {
    Tile(&'a TileMetadata),
    Generator(&'a GeneratorMetadata),
}

/// Variant facts Verify needs, independent of the entry kind.
pub struct VariantView<'a> {
    pub enabled: bool,
    pub schema: Option<&'a ParamsSchema>,
}

impl RegistryEntry<'_> {
    pub fn minimal_version(&self) -> ConfigVersion {
        match self {
            RegistryEntry::Tile(meta) => meta.minimal_version(),
            RegistryEntry::Generator(meta) => meta.minimal_version(),
        }
    }

    pub fn variant(&self, name: &VariantName) -> Option<VariantView<'_>> {
        match self {
            RegistryEntry::Tile(meta) => meta.variant(name).map(|variant| VariantView {
                enabled: variant.enabled(),
                schema: variant.schema(),
            }),
            RegistryEntry::Generator(meta) => meta.variant(name).map(|variant| VariantView {
                enabled: variant.enabled(),
                schema: variant.schema(),
            }),
        }
    }

    pub fn declared_variants(&self) -> Vec<&VariantName> {
        match self {
            RegistryEntry::Tile(meta) => meta.declared_variants(),
            RegistryEntry::Generator(meta) => meta.declared_variants(),
        }
    }
}

/// Process-wide catalogue of tile types and generators.
#[derive(Default)]
pub struct TileRegistry {
    tiles: HashMap<TileType, TileMetadata>,
    generators: HashMap<TileType, GeneratorMetadata>,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a normal tile type and its variants.
    ///
    /// Panics when the type is already registered: double registration is a
    /// provider bug and must fail at startup.
    pub fn register_tile(
        &mut self,
        tile_type: TileType,
        minimal_version: ConfigVersion,
        variants: &[VariantName],
    ) -> TileEnabler<'_> {
        if self.tiles.contains_key(&tile_type) {
            panic!("tile type {tile_type} registered twice");
        }
        let metadata = TileMetadata {
            minimal_version,
            variants: variants
                .iter()
                .map(|name| (name.clone(), TileVariant::declared()))
                .collect(),
        };
        let entry = self.tiles.entry(tile_type.clone()).or_insert(metadata);
        TileEnabler {
            tile_type,
            metadata: entry,
        }
    }

    /// Declare a generator type and its variants. The registry key gets the
    /// `GENERATE:` prefix applied here.
    pub fn register_generator(
        &mut self,
        tile_type: TileType,
        minimal_version: ConfigVersion,
        variants: &[VariantName],
    ) -> GeneratorEnabler<'_> {
        let key = tile_type.as_generator();
        if self.generators.contains_key(&key) {
            panic!("generator type {key} registered twice");
        }
        let metadata = GeneratorMetadata {
            minimal_version,
            variants: variants
                .iter()
                .map(|name| (name.clone(), GeneratorVariant::declared()))
                .collect(),
        };
        let entry = self.generators.entry(key.clone()).or_insert(metadata);
        GeneratorEnabler {
            tile_type: key,
            metadata: entry,
        }
    }

    pub fn tile_metadata(&self, tile_type: &TileType) -> Option<&TileMetadata> {
        self.tiles.get(tile_type)
    }

    /// Lookup by the full authored type, `GENERATE:` prefix included.
    pub fn generator_metadata(&self, tile_type: &TileType) -> Option<&GeneratorMetadata> {
        self.generators.get(tile_type)
    }

    /// Uniform lookup dispatching on the `GENERATE:` prefix.
    pub fn entry(&self, tile_type: &TileType) -> Option<RegistryEntry<'_>> {
        if tile_type.is_generator() {
            self.generators.get(tile_type).map(RegistryEntry::Generator)
        } else {
            self.tiles.get(tile_type).map(RegistryEntry::Tile)
        }
    }

    pub fn tile_types(&self) -> Vec<&TileType> {
        let mut types: Vec<_> = self.tiles.keys().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }

    pub fn generator_types(&self) -> Vec<&TileType> {
        let mut types: Vec<_> = self.generators.keys().collect();
        types.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        types
    }
}

/// Handle binding schemas and routes to a declared tile type.
pub struct TileEnabler<'a> {
    tile_type: TileType,
    metadata: &'a mut TileMetadata,
}

impl TileEnabler<'_> {
    /// Enable a declared variant with its params schema and backend route
    /// template (e.g. `/jenkins/default/build`).
    ///
    /// Panics on an undeclared variant.
    pub fn enable(self, variant: &VariantName, schema: ParamsSchema, route: &str) -> Self {
        let entry = self
            .metadata
            .variants
            .get_mut(variant)
            .unwrap_or_else(|| {
                panic!(
                    "variant {variant} was not declared for tile type {}",
                    self.tile_type
                )
            });
        entry.enabled = true;
        entry.schema = Some(Arc::new(schema));
        entry.route = Some(route.to_string());
        self
    }
}

/// Handle binding schemas and builders to a declared generator type.
pub struct GeneratorEnabler<'a> {
    tile_type: TileType,
    metadata: &'a mut GeneratorMetadata,
}

impl GeneratorEnabler<'_> {
    /// Enable a declared variant with its params schema and builder.
    ///
    /// Panics on an undeclared variant.
    pub fn enable(self, variant: &VariantName, schema: ParamsSchema, builder: TileBuilder) -> Self {
        let entry = self
            .metadata
            .variants
            .get_mut(variant)
            .unwrap_or_else(|| {
                panic!(
                    "variant {variant} was not declared for generator type {}",
                    self.tile_type
                )
            });
        entry.enabled = true;
        entry.schema = Some(Arc::new(schema));
        entry.builder = Some(builder);
        self
    }
}
