use super::build_response;
use crate::pot::PotService;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

pub fn routes(
    service: &Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    health(service.clone())
}

/// GET /api/health
///
/// Always answers 200, `healthy` tells whether the document store responds
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "metric",
    responses((status = 200, description = "Service state", body = HealthyDto))
)]
pub(super) fn health(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(warp::path!("api" / "health"))
        .and(warp::get())
        .and_then(|service: Arc<PotService>| async move {
            let state = service.health().await;
            let ret = dto::HealthyDto {
                healthy: state.is_healthy(),
                version: smartpot_core::CORE_VERSION.to_owned(),
                document_store: state.store.to_owned(),
                database_state: state.store_state,
                asset_store: state.asset_store.to_owned(),
            };
            build_response(StatusCode::OK, Ok(ret))
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct HealthyDto {
        pub healthy: bool,
        pub version: String,
        pub document_store: String,
        pub database_state: String,
        pub asset_store: String,
    }
}

pub use dto::HealthyDto;
