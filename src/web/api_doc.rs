use utoipa::OpenApi;

use super::handlers::HealthResponse;
use crate::broadcast::{AlertPair, SnapshotCounts, SnapshotPayload};
use crate::catalog::{Category, Satellite};

#[derive(OpenApi)]
#[openapi(
    paths(super::handlers::health, super::handlers::snapshot),
    components(
        schemas(
            HealthResponse,
            SnapshotPayload,
            SnapshotCounts,
            AlertPair,
            Satellite,
            Category,
        )
    ),
    info(
        title = "Sat Traffic API",
        description = "Aggregated satellite positions with proximity alerts",
        version = "0.1.0"
    ),
    tags(
        (name = "snapshot", description = "Catalog snapshots"),
        (name = "status", description = "Health and counters")
    )
)]
pub struct ApiDoc;
