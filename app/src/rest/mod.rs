use crate::error::ServiceError;
use crate::pot::PotService;
use serde::Serialize;
use smartpot_core::error::ValidationError;
use smartpot_core::parse_pot_id;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

mod data_routes;
mod doc_routes;
mod image_routes;
mod metric_routes;
mod user_routes;

/// Upper bound for json request bodies
const JSON_BODY_LIMIT: u64 = 4096;
const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

pub async fn dispatch_server_daemon(
    service: Arc<PotService>,
    addr: SocketAddr,
    max_image_bytes: u64,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), warp::Error> {
    let (bound, server) = warp::serve(api(&service, max_image_bytes))
        .try_bind_with_graceful_shutdown(addr, shutdown)?;

    info!("Starting webserver at: {}", bound);
    server.await;
    info!("Webserver stopped");
    Ok(())
}

/// All routes, with rejections rendered as json
pub fn api(
    service: &Arc<PotService>,
    max_image_bytes: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    user_routes::routes(service)
        .or(image_routes::routes(service, max_image_bytes))
        .or(data_routes::routes(service))
        .or(metric_routes::routes(service))
        .or(doc_routes::routes())
        .recover(handle_rejection)
        .with(warp::log::custom(|info| {
            info!(
                target: "smartpot::rest",
                "{} {} {} {:?}",
                info.method(),
                info.path(),
                info.status().as_u16(),
                info.elapsed()
            );
        }))
}

/// Renders a service result as json, using `status` on success
pub(crate) fn build_response<T: Serialize>(
    status: StatusCode,
    resp: Result<T, ServiceError>,
) -> Result<Response, Rejection> {
    build_raw_response(
        resp.map(|data| warp::reply::with_status(warp::reply::json(&data), status).into_response()),
    )
}

pub(crate) fn build_raw_response(resp: Result<Response, ServiceError>) -> Result<Response, Rejection> {
    match resp {
        Ok(reply) => Ok(reply),
        Err(err) => Ok(error_response(err)),
    }
}

fn error_response(err: ServiceError) -> Response {
    let (status, message) = match &err {
        ServiceError::Validation(ValidationError::PotClaimed(_)) => {
            warn!("{}", err);
            (StatusCode::CONFLICT, err.to_string())
        }
        ServiceError::Validation(_) => {
            warn!("{}", err);
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        ServiceError::NotFound(_) => {
            info!("{}", err);
            (StatusCode::NOT_FOUND, err.to_string())
        }
        ServiceError::Dependency(cause) => {
            error!("{}", cause);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_owned(),
            )
        }
    };
    message_response(status, message)
}

fn message_response(status: StatusCode, message: String) -> Response {
    warp::reply::with_status(warp::reply::json(&dto::MessageDto { message }), status)
        .into_response()
}

/// A pot id in the path that is not an integer
#[derive(Debug)]
pub(crate) struct InvalidPathId(ValidationError);

impl warp::reject::Reject for InvalidPathId {}

/// Refuses a malformed pot id before the request body is looked at
pub(crate) async fn valid_pot_id(raw_id: String) -> Result<String, Rejection> {
    match parse_pot_id(&raw_id) {
        Ok(_) => Ok(raw_id),
        Err(e) => Err(warp::reject::custom(InvalidPathId(e))),
    }
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if let Some(InvalidPathId(e)) = err.find::<InvalidPathId>() {
        warn!("{}", e);
        return Ok(message_response(StatusCode::BAD_REQUEST, e.to_string()));
    }

    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length header required")
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid query string")
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "Invalid header")
    } else {
        error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    };
    Ok(message_response(status, message.to_owned()))
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct MessageDto {
        pub message: String,
    }
}

#[cfg(test)]
mod test;
