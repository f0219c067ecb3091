//! Config verification stage.
//!
//! Validates the top level of a parsed config, then every tile against the
//! registry. Top-level checks stop at the first failing field; tile errors
//! accumulate independently so one broken tile never hides another.

use crate::config::errors::{config_extract, json_quoted, ConfigError, ConfigErrorId};
use crate::config::schema::{Config, ConfigBag, Tile};
use crate::config::usecase::ConfigUsecase;
use crate::config::version::ConfigVersion;
use crate::params::{validate_params, ParamsError};

impl ConfigUsecase {
    /// Verify the bag's config in place. `configVariant` defaulting happens
    /// here; Hydrate relies on it.
    pub fn verify(&self, bag: &mut ConfigBag) {
        let Some(config) = bag.config.as_mut() else {
            return;
        };
        let errors = &mut bag.errors;

        let Some(version) = config.version else {
            errors.push(
                ConfigError::new(ConfigErrorId::MissingRequiredField, "missing config version")
                    .with_field("version"),
            );
            return;
        };
        if !version.is_supported() {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnsupportedVersion,
                    format!("unsupported config version {version}"),
                )
                .with_field("version")
                .with_value(json_quoted(&version.to_string()))
                .with_expected(ConfigVersion::supported_range_hint()),
            );
            return;
        }

        if let Some(error) = verify_layout(config) {
            errors.push(error);
        }

        if let Some(tiles) = config.tiles.as_mut() {
            for tile in tiles.iter_mut() {
                self.verify_tile(version, tile, errors);
            }
        }
    }

    /// Verify one tile. First failure wins for the tile; group children are
    /// verified independently of each other.
    pub(crate) fn verify_tile(
        &self,
        version: ConfigVersion,
        tile: &mut Tile,
        errors: &mut Vec<ConfigError>,
    ) {
        let Some(tile_type) = tile.tile_type.clone() else {
            errors.push(
                ConfigError::new(ConfigErrorId::MissingRequiredField, "tile without a type")
                    .with_field("type")
                    .with_extract(config_extract(tile)),
            );
            return;
        };

        for (field, value) in [("rowSpan", tile.row_span), ("columnSpan", tile.column_span)] {
            if value.is_some_and(|span| span <= 0) {
                errors.push(
                    ConfigError::new(
                        ConfigErrorId::InvalidFieldValue,
                        format!("{field} must be positive"),
                    )
                    .with_field(field)
                    .with_expected(format!("{field} > 0"))
                    .with_extract(config_extract(tile)),
                );
                return;
            }
        }

        if tile_type.is_empty_tile() {
            if let Some(field) = unauthorized_empty_field(tile) {
                errors.push(
                    ConfigError::new(
                        ConfigErrorId::UnauthorizedField,
                        format!("{field} is not allowed on an EMPTY tile"),
                    )
                    .with_field(field)
                    .with_extract(config_extract(tile)),
                );
            }
            return;
        }

        if tile_type.is_group() {
            self.verify_group(version, tile, errors);
            return;
        }

        if tile.config_variant.is_none() {
            tile.config_variant = Some(Default::default());
        }
        let variant = tile.config_variant.clone().unwrap_or_default();
        let extract = config_extract(tile);

        let Some(entry) = self.registry().entry(&tile_type) else {
            let error = if tile_type.is_generator() {
                ConfigError::new(
                    ConfigErrorId::UnknownGeneratorTileType,
                    format!("unknown generator tile type {tile_type}"),
                )
                .with_expected(joined(self.registry().generator_types()))
            } else {
                ConfigError::new(
                    ConfigErrorId::UnknownTileType,
                    format!("unknown tile type {tile_type}"),
                )
                .with_expected(joined(self.registry().tile_types()))
            };
            errors.push(error.with_field("type").with_extract(extract));
            return;
        };

        if entry.minimal_version() > version {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnsupportedTileInThisVersion,
                    format!("tile type {tile_type} requires a newer config version"),
                )
                .with_field("type")
                .with_expected(format!("version >= \"{}\"", entry.minimal_version()))
                .with_extract(extract),
            );
            return;
        }

        let Some(variant_view) = entry.variant(&variant) else {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnknownVariant,
                    format!("unknown variant {variant} for tile type {tile_type}"),
                )
                .with_field("configVariant")
                .with_value(json_quoted(variant.as_str()))
                .with_expected(joined(entry.declared_variants()))
                .with_extract(extract),
            );
            return;
        };
        if !variant_view.enabled {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::DisabledVariant,
                    format!("variant {variant} of tile type {tile_type} is disabled"),
                )
                .with_field("configVariant")
                .with_value(json_quoted(variant.as_str()))
                .with_extract(extract),
            );
            return;
        }

        let Some(params) = tile.params.as_ref() else {
            errors.push(
                ConfigError::new(ConfigErrorId::MissingRequiredField, "tile without params")
                    .with_field("params")
                    .with_extract(extract),
            );
            return;
        };
        let Some(schema) = variant_view.schema else {
            errors.push(
                ConfigError::new(
                    ConfigErrorId::UnexpectedError,
                    format!("no params schema bound for {tile_type}/{variant}"),
                )
                .with_field("params")
                .with_extract(extract),
            );
            return;
        };
        if let Err(err) = validate_params(schema, params, version) {
            errors.push(params_error_to_config_error(err, extract));
        }
    }

    fn verify_group(
        &self,
        version: ConfigVersion,
        tile: &mut Tile,
        errors: &mut Vec<ConfigError>,
    ) {
        for (field, present) in [
            ("params", tile.params.is_some()),
            ("configVariant", tile.config_variant.is_some()),
        ] {
            if present {
                errors.push(
                    ConfigError::new(
                        ConfigErrorId::UnauthorizedField,
                        format!("{field} is not allowed on a GROUP tile"),
                    )
                    .with_field(field)
                    .with_extract(config_extract(tile)),
                );
                return;
            }
        }

        match tile.tiles.as_deref() {
            None => {
                errors.push(
                    ConfigError::new(ConfigErrorId::MissingRequiredField, "GROUP without tiles")
                        .with_field("tiles")
                        .with_extract(config_extract(tile)),
                );
                return;
            }
            Some([]) => {
                errors.push(
                    ConfigError::new(ConfigErrorId::InvalidFieldValue, "GROUP with empty tiles")
                        .with_field("tiles")
                        .with_extract(config_extract(tile)),
                );
                return;
            }
            Some(_) => {}
        }

        // Serialised before child verification mutates the children.
        let group_extract = config_extract(tile);
        let Some(children) = tile.tiles.as_mut() else {
            return;
        };
        for child in children.iter_mut() {
            let forbidden = child
                .tile_type
                .as_ref()
                .is_some_and(|child_type| child_type.is_group() || child_type.is_empty_tile());
            if forbidden {
                errors.push(
                    ConfigError::new(
                        ConfigErrorId::UnauthorizedSubtileType,
                        "GROUP children must be concrete tiles",
                    )
                    .with_extract(group_extract.clone())
                    .with_highlight(config_extract(child)),
                );
                continue;
            }
            self.verify_tile(version, child, errors);
        }
    }
}

/// Top-level field checks after version validation: columns → zoom → tiles,
/// first failure only.
fn verify_layout(config: &Config) -> Option<ConfigError> {
    let extract = config_extract(config);

    let error = match config.columns {
        None => ConfigError::new(ConfigErrorId::MissingRequiredField, "missing columns")
            .with_field("columns"),
        Some(columns) if columns <= 0 => {
            ConfigError::new(ConfigErrorId::InvalidFieldValue, "columns must be positive")
                .with_field("columns")
                .with_expected("columns > 0")
        }
        Some(_) => match config.zoom {
            Some(zoom) if zoom <= 0.0 => {
                ConfigError::new(ConfigErrorId::InvalidFieldValue, "zoom must be positive")
                    .with_field("zoom")
                    .with_expected("zoom > 0")
            }
            Some(zoom) if zoom > 10.0 => {
                ConfigError::new(ConfigErrorId::InvalidFieldValue, "zoom out of range")
                    .with_field("zoom")
                    .with_expected("zoom <= 10")
            }
            _ => match config.tiles.as_deref() {
                None => ConfigError::new(ConfigErrorId::MissingRequiredField, "missing tiles")
                    .with_field("tiles"),
                Some([]) => {
                    ConfigError::new(ConfigErrorId::InvalidFieldValue, "tiles must not be empty")
                        .with_field("tiles")
                }
                Some(_) => return None,
            },
        },
    };
    Some(error.with_extract(extract))
}

fn unauthorized_empty_field(tile: &Tile) -> Option<&'static str> {
    if tile.params.is_some() {
        Some("params")
    } else if tile.config_variant.is_some() {
        Some("configVariant")
    } else if tile.tiles.is_some() {
        Some("tiles")
    } else {
        None
    }
}

fn joined<T: std::fmt::Display>(items: Vec<T>) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn params_error_to_config_error(err: ParamsError, extract: String) -> ConfigError {
    match err {
        ParamsError::UnknownField { field, expected } => ConfigError::new(
            ConfigErrorId::UnknownField,
            format!("unknown params field {field:?}"),
        )
        .with_field(field)
        .with_expected(expected)
        .with_extract(extract),
        ParamsError::TypeMismatch { field, expected } => ConfigError::new(
            ConfigErrorId::FieldTypeMismatch,
            format!("params field {field:?} has the wrong type"),
        )
        .with_field(field)
        .with_expected(expected)
        .with_extract(extract),
        ParamsError::UnsupportedInVersion { field, since } => ConfigError::new(
            ConfigErrorId::UnsupportedTileParamInThisVersion,
            format!("params field {field:?} requires a newer config version"),
        )
        .with_field(field)
        .with_expected(format!("version >= {since}"))
        .with_extract(extract),
        ParamsError::InvalidValue { field, expected } => ConfigError::new(
            ConfigErrorId::InvalidFieldValue,
            format!("params field {field:?} has an invalid value"),
        )
        .with_field(field)
        .with_expected(expected)
        .with_extract(extract),
        ParamsError::MissingRequired { field } => ConfigError::new(
            ConfigErrorId::MissingRequiredField,
            format!("params field {field:?} is required"),
        )
        .with_field(field)
        .with_extract(extract),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::VariantName;
    use crate::config::testsupport::{
        bag_from, current_version_bag, fixed_builder, test_registry, test_usecase_with_registry,
        tile_from, MockRepository,
    };
    use crate::config::version::{CURRENT_VERSION, MINIMAL_VERSION};
    use crate::monitorables::jenkins;
    use crate::registry::TileRegistry;
    use std::collections::HashMap;

    fn usecase() -> ConfigUsecase {
        test_usecase_with_registry(MockRepository::default(), HashMap::new(), test_registry())
    }

    fn registry_with_generator() -> TileRegistry {
        let mut registry = test_registry();
        registry
            .register_generator(
                "JENKINS-BUILD".into(),
                MINIMAL_VERSION,
                &[VariantName::default()],
            )
            .enable(
                &VariantName::default(),
                jenkins::generator_schema(),
                fixed_builder(Vec::new()),
            );
        registry
    }

    #[test]
    fn test_verify_success() {
        let mut bag = bag_from(
            r#"{"version":"2.0","columns":4,"zoom":2.5,"tiles":[{"type":"EMPTY"}]}"#,
        );
        usecase().verify(&mut bag);
        assert!(bag.errors.is_empty());
    }

    #[test]
    fn test_verify_top_level_failures() {
        struct Case {
            raw: &'static str,
            id: ConfigErrorId,
            field: &'static str,
            expected: Option<&'static str>,
            value: Option<&'static str>,
            has_extract: bool,
        }
        let cases = [
            Case {
                raw: r#"{}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: "version",
                expected: None,
                value: None,
                has_extract: false,
            },
            Case {
                raw: r#"{"version":"0.0"}"#,
                id: ConfigErrorId::UnsupportedVersion,
                field: "version",
                expected: Some("\"1.0\" <= version <= \"2.0\""),
                value: Some("\"0.0\""),
                has_extract: false,
            },
            Case {
                raw: r#"{"version":"999.999"}"#,
                id: ConfigErrorId::UnsupportedVersion,
                field: "version",
                expected: Some("\"1.0\" <= version <= \"2.0\""),
                value: Some("\"999.999\""),
                has_extract: false,
            },
            Case {
                raw: r#"{"version":"2.0","tiles":[{"type":"EMPTY"}]}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: "columns",
                expected: None,
                value: None,
                has_extract: true,
            },
            Case {
                raw: r#"{"version":"2.0","columns":0,"tiles":[{"type":"EMPTY"}]}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: "columns",
                expected: Some("columns > 0"),
                value: None,
                has_extract: true,
            },
            Case {
                raw: r#"{"version":"2.0","columns":1,"zoom":0,"tiles":[{"type":"EMPTY"}]}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: "zoom",
                expected: Some("zoom > 0"),
                value: None,
                has_extract: true,
            },
            Case {
                raw: r#"{"version":"2.0","columns":1,"zoom":19.8,"tiles":[{"type":"EMPTY"}]}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: "zoom",
                expected: Some("zoom <= 10"),
                value: None,
                has_extract: true,
            },
            Case {
                raw: r#"{"version":"2.0","columns":1}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: "tiles",
                expected: None,
                value: None,
                has_extract: true,
            },
            Case {
                raw: r#"{"version":"2.0","columns":1,"tiles":[]}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: "tiles",
                expected: None,
                value: None,
                has_extract: true,
            },
        ];

        for case in cases {
            let mut bag = bag_from(case.raw);
            usecase().verify(&mut bag);
            assert_eq!(bag.errors.len(), 1, "raw: {}", case.raw);
            let error = &bag.errors[0];
            assert_eq!(error.id, case.id, "raw: {}", case.raw);
            assert_eq!(error.data.field_name.as_deref(), Some(case.field));
            assert_eq!(error.data.expected.as_deref(), case.expected);
            assert_eq!(error.data.value.as_deref(), case.value);
            assert_eq!(error.data.config_extract.is_some(), case.has_extract);
        }
    }

    #[test]
    fn test_verify_top_level_extract_is_whole_config() {
        let mut bag = bag_from(r#"{"version":"2.0","columns":0,"tiles":[{"type":"EMPTY"}]}"#);
        usecase().verify(&mut bag);
        assert_eq!(
            bag.errors[0].data.config_extract.as_deref(),
            Some(r#"{"version":"2.0","columns":0,"tiles":[{"type":"EMPTY"}]}"#)
        );
    }

    #[test]
    fn test_verify_tile_success() {
        let mut tile = tile_from(
            r#"{"type":"PORT","columnSpan":2,"rowSpan":2,"params":{"hostname":"bserver.com","port":22}}"#,
        );
        let mut errors = Vec::new();
        usecase().verify_tile(CURRENT_VERSION, &mut tile, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_verify_tile_success_empty_and_group() {
        let usecase = usecase();
        let mut errors = Vec::new();

        let mut tile = tile_from(r#"{"type":"EMPTY"}"#);
        usecase.verify_tile(CURRENT_VERSION, &mut tile, &mut errors);
        assert!(errors.is_empty());

        let mut group = tile_from(
            r#"{"type":"GROUP","label":"...","tiles":[
                {"type":"PING","params":{"hostname":"aserver.com"}},
                {"type":"PORT","params":{"hostname":"bserver.com","port":22}}]}"#,
        );
        usecase.verify_tile(CURRENT_VERSION, &mut group, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_verify_tile_failures() {
        struct Case {
            raw: &'static str,
            id: ConfigErrorId,
            field: Option<&'static str>,
            expected: Option<&'static str>,
            value: Option<&'static str>,
            extract: Option<&'static str>,
            highlight: Option<&'static str>,
        }
        let cases = [
            Case {
                raw: r#"{"type":"PING","columnSpan":-1,"params":{"hostname":"server.com"}}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: Some("columnSpan"),
                expected: Some("columnSpan > 0"),
                value: None,
                extract: Some(r#"{"type":"PING","columnSpan":-1,"params":{"hostname":"server.com"}}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PING","rowSpan":-1,"params":{"hostname":"server.com"}}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: Some("rowSpan"),
                expected: Some("rowSpan > 0"),
                value: None,
                extract: Some(r#"{"type":"PING","rowSpan":-1,"params":{"hostname":"server.com"}}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"GROUP","tiles":[{"type":"EMPTY"}]}"#,
                id: ConfigErrorId::UnauthorizedSubtileType,
                field: None,
                expected: None,
                value: None,
                extract: Some(r#"{"type":"GROUP","tiles":[{"type":"EMPTY"}]}"#),
                highlight: Some(r#"{"type":"EMPTY"}"#),
            },
            Case {
                raw: r#"{"type":"GROUP","tiles":[{"type":"GROUP"}]}"#,
                id: ConfigErrorId::UnauthorizedSubtileType,
                field: None,
                expected: None,
                value: None,
                extract: Some(r#"{"type":"GROUP","tiles":[{"type":"GROUP"}]}"#),
                highlight: Some(r#"{"type":"GROUP"}"#),
            },
            Case {
                raw: r#"{"type":"GROUP","params":{"test":"test"}}"#,
                id: ConfigErrorId::UnauthorizedField,
                field: Some("params"),
                expected: None,
                value: None,
                extract: Some(r#"{"type":"GROUP","params":{"test":"test"}}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"GROUP"}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: Some("tiles"),
                expected: None,
                value: None,
                extract: Some(r#"{"type":"GROUP"}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"GROUP","tiles":[]}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: Some("tiles"),
                expected: None,
                value: None,
                extract: Some(r#"{"type":"GROUP","tiles":[]}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PING"}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: Some("params"),
                expected: None,
                value: None,
                extract: Some(r#"{"type":"PING","configVariant":"default"}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PING","params":{}}"#,
                id: ConfigErrorId::MissingRequiredField,
                field: Some("hostname"),
                expected: None,
                value: None,
                extract: Some(r#"{"type":"PING","params":{},"configVariant":"default"}"#),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PING","params":{"host":"server.com"}}"#,
                id: ConfigErrorId::UnknownField,
                field: Some("host"),
                expected: Some("hostname, values"),
                value: None,
                extract: Some(
                    r#"{"type":"PING","params":{"host":"server.com"},"configVariant":"default"}"#,
                ),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PORT","params":{"hostname":"server.com","port":-20}}"#,
                id: ConfigErrorId::InvalidFieldValue,
                field: Some("port"),
                expected: Some("port > 0"),
                value: None,
                extract: Some(
                    r#"{"type":"PORT","params":{"hostname":"server.com","port":-20},"configVariant":"default"}"#,
                ),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"PING","params":{"hostname":["server.com"]}}"#,
                id: ConfigErrorId::FieldTypeMismatch,
                field: Some("hostname"),
                expected: Some("string"),
                value: None,
                extract: Some(
                    r#"{"type":"PING","params":{"hostname":["server.com"]},"configVariant":"default"}"#,
                ),
                highlight: None,
            },
            Case {
                raw: r#"{"type":"JENKINS-BUILD","configVariant":"disabledVariant","params":{}}"#,
                id: ConfigErrorId::DisabledVariant,
                field: Some("configVariant"),
                expected: None,
                value: Some(r#""disabledVariant""#),
                extract: Some(
                    r#"{"type":"JENKINS-BUILD","params":{},"configVariant":"disabledVariant"}"#,
                ),
                highlight: None,
            },
        ];

        for case in cases {
            let mut tile = tile_from(case.raw);
            let mut errors = Vec::new();
            usecase().verify_tile(CURRENT_VERSION, &mut tile, &mut errors);
            assert_eq!(errors.len(), 1, "raw: {}", case.raw);
            let error = &errors[0];
            assert_eq!(error.id, case.id, "raw: {}", case.raw);
            assert_eq!(error.data.field_name.as_deref(), case.field, "raw: {}", case.raw);
            assert_eq!(error.data.expected.as_deref(), case.expected, "raw: {}", case.raw);
            assert_eq!(error.data.value.as_deref(), case.value, "raw: {}", case.raw);
            assert_eq!(
                error.data.config_extract.as_deref(),
                case.extract,
                "raw: {}",
                case.raw
            );
            assert_eq!(
                error.data.config_extract_highlight.as_deref(),
                case.highlight,
                "raw: {}",
                case.raw
            );
        }
    }

    #[test]
    fn test_verify_tile_below_minimal_version() {
        let mut registry = TileRegistry::new();
        registry
            .register_tile(
                "PING".into(),
                crate::config::version::ConfigVersion::new(999, 0),
                &[VariantName::default()],
            )
            .enable(
                &VariantName::default(),
                crate::monitorables::ping::params_schema(),
                "/ping/default/ping",
            );
        let usecase =
            test_usecase_with_registry(MockRepository::default(), HashMap::new(), registry);

        let mut tile = tile_from(r#"{"type":"PING","params":{"hostname":"server.com"}}"#);
        let mut errors = Vec::new();
        usecase.verify_tile(CURRENT_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnsupportedTileInThisVersion);
        assert_eq!(errors[0].data.field_name.as_deref(), Some("type"));
        assert_eq!(errors[0].data.expected.as_deref(), Some("version >= \"999.0\""));
        assert_eq!(
            errors[0].data.config_extract.as_deref(),
            Some(r#"{"type":"PING","params":{"hostname":"server.com"},"configVariant":"default"}"#)
        );
    }

    #[test]
    fn test_verify_tile_unknown_type() {
        let mut tile = tile_from(r#"{"type":"PONG","params":{"hostname":"server.com"}}"#);
        let mut errors = Vec::new();
        usecase().verify_tile(CURRENT_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnknownTileType);
        assert_eq!(errors[0].data.field_name.as_deref(), Some("type"));
        assert_eq!(
            errors[0].data.config_extract.as_deref(),
            Some(r#"{"type":"PONG","params":{"hostname":"server.com"},"configVariant":"default"}"#)
        );
    }

    #[test]
    fn test_verify_tile_with_generator() {
        let usecase = test_usecase_with_registry(
            MockRepository::default(),
            HashMap::new(),
            registry_with_generator(),
        );

        let mut tile = tile_from(
            r#"{"type":"GENERATE:JENKINS-BUILD","configVariant":"default","params":{"job":"job1"}}"#,
        );
        let mut errors = Vec::new();
        usecase.verify_tile(CURRENT_VERSION, &mut tile, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_verify_tile_with_unknown_generator_type() {
        let usecase = test_usecase_with_registry(
            MockRepository::default(),
            HashMap::new(),
            registry_with_generator(),
        );

        let mut tile = tile_from(r#"{"type":"GENERATE:PING","params":{}}"#);
        let mut errors = Vec::new();
        usecase.verify_tile(CURRENT_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnknownGeneratorTileType);
        assert_eq!(errors[0].data.field_name.as_deref(), Some("type"));
        assert_eq!(errors[0].data.expected.as_deref(), Some("GENERATE:JENKINS-BUILD"));
        assert_eq!(
            errors[0].data.config_extract.as_deref(),
            Some(r#"{"type":"GENERATE:PING","params":{},"configVariant":"default"}"#)
        );
    }

    #[test]
    fn test_verify_tile_with_unknown_variant() {
        let mut tile = tile_from(
            r#"{"type":"JENKINS-BUILD","configVariant":"test","params":{"job":"job1"}}"#,
        );
        let mut errors = Vec::new();
        usecase().verify_tile(CURRENT_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnknownVariant);
        assert_eq!(errors[0].data.field_name.as_deref(), Some("configVariant"));
        assert_eq!(errors[0].data.value.as_deref(), Some(r#""test""#));
        let expected = errors[0].data.expected.as_deref().unwrap();
        assert!(expected.contains("default"));
        assert!(expected.contains("disabledVariant"));
        assert_eq!(
            errors[0].data.config_extract.as_deref(),
            Some(r#"{"type":"JENKINS-BUILD","params":{"job":"job1"},"configVariant":"test"}"#)
        );
    }

    #[test]
    fn test_verify_tile_generator_with_unknown_variant() {
        let usecase = test_usecase_with_registry(
            MockRepository::default(),
            HashMap::new(),
            registry_with_generator(),
        );

        let mut tile = tile_from(
            r#"{"type":"GENERATE:JENKINS-BUILD","configVariant":"test","params":{"job":"job1"}}"#,
        );
        let mut errors = Vec::new();
        usecase.verify_tile(CURRENT_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnknownVariant);
        assert!(errors[0]
            .data
            .expected
            .as_deref()
            .unwrap()
            .contains("default"));
    }

    #[test]
    fn test_verify_tile_param_version_gate() {
        let mut tile = tile_from(
            r#"{"type":"JENKINS-BUILD","params":{"job":"test","branch":"main"}}"#,
        );
        let mut errors = Vec::new();
        usecase().verify_tile(MINIMAL_VERSION, &mut tile, &mut errors);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].id, ConfigErrorId::UnsupportedTileParamInThisVersion);
        assert_eq!(errors[0].data.field_name.as_deref(), Some("branch"));
        assert_eq!(errors[0].data.expected.as_deref(), Some("version >= 1.1"));
    }

    #[test]
    fn test_verify_is_idempotent() {
        let raw = r#"{"version":"2.0","columns":2,"tiles":[
            {"type":"PING","params":{"hostname":"a"}},
            {"type":"PONG"},
            {"type":"PORT","params":{"hostname":"b","port":-1}}]}"#;
        let usecase = usecase();

        let mut bag = bag_from(raw);
        usecase.verify(&mut bag);
        let first = bag.errors.clone();

        usecase.verify(&mut bag);
        let second: Vec<_> = bag.errors[first.len()..].to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_without_config_is_a_no_op() {
        let mut bag = current_version_bag();
        bag.config = None;
        usecase().verify(&mut bag);
        assert!(bag.errors.is_empty());
    }
}
