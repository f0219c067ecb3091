//! Config hydration stage.
//!
//! Walks a verified config top-down, assigns every concrete tile its backend
//! URL and default polling delay, and expands generator tiles into the tiles
//! their builder returns. Hydrate assumes Verify ran and does not
//! re-validate; generator failures are the only errors it can add.

use std::future::Future;
use std::pin::Pin;

use serde_json::Map;
use serde_json::Value;

use crate::config::errors::{config_extract, ConfigError, ConfigErrorId};
use crate::config::schema::{ConfigBag, GeneratedTile, Tile, TileType, VariantName};
use crate::config::usecase::ConfigUsecase;
use crate::params::{build_url, ParamsValues};
use crate::registry::GeneratorError;

/// Polling delay assigned to tiles that do not set their own.
pub const DEFAULT_INITIAL_MAX_DELAY: u64 = 1000;

impl ConfigUsecase {
    /// Hydrate the bag's config in place.
    pub async fn hydrate(&self, bag: &mut ConfigBag) {
        let Some(config) = bag.config.as_mut() else {
            return;
        };
        let Some(tiles) = config.tiles.as_mut() else {
            return;
        };
        self.hydrate_tiles(tiles, &mut bag.errors, true).await;
    }

    /// Hydrate one tile list. Generator tiles are spliced in place; groups
    /// whose children all vanish are dropped.
    ///
    /// Boxed so the group descent can recurse.
    fn hydrate_tiles<'a>(
        &'a self,
        tiles: &'a mut Vec<Tile>,
        errors: &'a mut Vec<ConfigError>,
        descend_groups: bool,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut index = 0;
            while index < tiles.len() {
                let Some(tile_type) = tiles[index].tile_type.clone() else {
                    index += 1;
                    continue;
                };

                if tile_type.is_empty_tile() {
                    index += 1;
                    continue;
                }

                if tile_type.is_group() {
                    if descend_groups {
                        if let Some(children) = tiles[index].tiles.as_mut() {
                            self.hydrate_tiles(children, errors, false).await;
                        }
                        let emptied = tiles[index]
                            .tiles
                            .as_ref()
                            .is_none_or(|children| children.is_empty());
                        if emptied {
                            tracing::debug!("dropping group whose tiles all vanished");
                            tiles.remove(index);
                            continue;
                        }
                    }
                    index += 1;
                    continue;
                }

                if tile_type.is_generator() {
                    match self.expand_generator(&tiles[index], &tile_type).await {
                        Ok(generated) => {
                            tiles.splice(index..=index, generated);
                            // Spliced tiles are concrete; the loop hydrates them next.
                        }
                        Err(error) => {
                            errors.push(error);
                            tiles.remove(index);
                        }
                    }
                    continue;
                }

                self.hydrate_concrete(&mut tiles[index], errors);
                index += 1;
            }
        })
    }

    /// Assign the backend URL and default delay of one concrete tile.
    fn hydrate_concrete(&self, tile: &mut Tile, errors: &mut Vec<ConfigError>) {
        let Some(tile_type) = tile.tile_type.clone() else {
            return;
        };
        let variant = tile.config_variant.clone().unwrap_or_default();

        let bound = self
            .registry()
            .tile_metadata(&tile_type)
            .and_then(|metadata| metadata.variant(&variant))
            .and_then(|entry| match (entry.schema(), entry.route()) {
                (Some(schema), Some(route)) => Some((schema.clone(), route.to_string())),
                _ => None,
            });
        let Some((schema, route)) = bound else {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnableToHydrate,
                    format!("no route bound for {tile_type}/{variant}"),
                )
                .with_extract(config_extract(tile)),
            );
            return;
        };

        let values = ParamsValues::new(tile.params.clone().unwrap_or_default());
        tile.url = Some(build_url(&route, &schema, &values));
        if tile.initial_max_delay.is_none() {
            tile.initial_max_delay = Some(DEFAULT_INITIAL_MAX_DELAY);
        }
    }

    /// Run a generator tile's builder and turn its output into concrete
    /// tiles. Falls back to the last cached output on deadline expiry only.
    async fn expand_generator(
        &self,
        tile: &Tile,
        tile_type: &TileType,
    ) -> Result<Vec<Tile>, ConfigError> {
        let variant = tile.config_variant.clone().unwrap_or_default();
        let unable = |message: String| {
            ConfigError::new(ConfigErrorId::UnableToHydrate, message)
                .with_extract(config_extract(tile))
        };

        let builder = self
            .registry()
            .generator_metadata(tile_type)
            .and_then(|metadata| metadata.variant(&variant))
            .and_then(|entry| entry.builder())
            .cloned()
            .ok_or_else(|| unable(format!("no generator bound for {tile_type}/{variant}")))?;

        let params = tile.params.clone().unwrap_or_default();
        let cache_key = generator_cache_key(tile_type, &variant, &params);

        let invocation = tokio::time::timeout(
            self.generator_timeout,
            builder(ParamsValues::new(params)),
        )
        .await;

        let generated = match invocation {
            Ok(Ok(generated)) => {
                self.generator_cache.put(&cache_key, generated.clone());
                generated
            }
            Ok(Err(GeneratorError::Timeout)) | Err(_) => match self.generator_cache.get(&cache_key)
            {
                Some(cached) => {
                    tracing::warn!(
                        key = %cache_key,
                        "generator timed out, serving cached result"
                    );
                    cached
                }
                None => {
                    return Err(unable(format!(
                        "generator {tile_type}/{variant} timed out with no cached result"
                    )));
                }
            },
            Ok(Err(GeneratorError::Failed(message))) => {
                tracing::warn!(
                    tile_type = %tile_type,
                    variant = %variant,
                    error = %message,
                    "generator failed"
                );
                return Err(unable(message));
            }
        };

        Ok(generated
            .into_iter()
            .map(|output| generated_tile(tile, &variant, output))
            .collect())
    }
}

/// Cache key of one generator invocation: type, variant and canonical
/// (sorted-key, minified) params JSON.
fn generator_cache_key(
    tile_type: &TileType,
    variant: &VariantName,
    params: &Map<String, Value>,
) -> String {
    let canonical = serde_json::to_string(params).unwrap_or_default();
    format!("{tile_type}_{variant}_{canonical}")
}

/// Materialise one generator output as a concrete tile. The generator
/// tile's variant always carries over; its label and spans only when the
/// builder did not set its own.
fn generated_tile(generator: &Tile, variant: &VariantName, output: GeneratedTile) -> Tile {
    Tile {
        tile_type: generator.tile_type.as_ref().map(TileType::generated),
        label: output.label.or_else(|| generator.label.clone()),
        row_span: generator.row_span,
        column_span: generator.column_span,
        tiles: None,
        params: Some(output.params),
        config_variant: Some(output.config_variant.unwrap_or_else(|| variant.clone())),
        url: None,
        initial_max_delay: None,
    }
}
