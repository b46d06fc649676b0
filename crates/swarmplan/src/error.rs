//! Error types for planning and for the geometry provider seam.
//!
//! - `ProviderError`: raised by a `GeometryProvider` (covering, centroid, distance).
//! - `PlanError`: everything a planning call can return; provider failures are
//!   wrapped with the operation name and the agent or tile range involved.

use std::path::PathBuf;

use thiserror::Error;

/// Failure inside a geometry provider.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("geometry has no coordinates")]
    EmptyGeometry,
    #[error("non-finite coordinate")]
    NonFinite,
    #[error("{what} out of range: {value}")]
    OutOfRange { what: &'static str, value: f64 },
    #[error("covering exceeds {limit} tiles at zoom {zoom}")]
    TooManyTiles { limit: usize, zoom: u8 },
}

/// Failure of a planning operation.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("expected {expected} geometry, found {found}")]
    InvalidGeometryKind {
        expected: &'static str,
        found: &'static str,
    },
    #[error("insufficient tiles: {tiles} tiles for {agents} agents")]
    InsufficientTiles { tiles: usize, agents: usize },
    #[error("agent matching produced no assignments")]
    AllocationFailed,
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("{op} failed ({context})")]
    Provider {
        op: &'static str,
        context: String,
        #[source]
        source: ProviderError,
    },
    #[error("reading {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("geojson: {0}")]
    GeoJson(String),
}

/// Adapter for `map_err`: wraps a provider failure with its operation and context.
pub(crate) fn provider_err(
    op: &'static str,
    context: impl Into<String>,
) -> impl FnOnce(ProviderError) -> PlanError {
    let context = context.into();
    move |source| PlanError::Provider {
        op,
        context,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_context_is_rendered() {
        let err = provider_err("tile_cover", "zoom 18")(ProviderError::EmptyGeometry);
        assert_eq!(err.to_string(), "tile_cover failed (zoom 18)");
        assert!(matches!(
            err,
            PlanError::Provider {
                source: ProviderError::EmptyGeometry,
                ..
            }
        ));
    }
}
