use super::dto::MessageDto;
use super::{build_response, valid_pot_id, JSON_BODY_LIMIT};
use crate::pot::PotService;
use bytes::Bytes;
use smartpot_core::{ReadingMessage, ReadingPayload};
use std::collections::HashMap;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

pub fn routes(
    service: &Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    insert_data(service.clone()).or(find_data(service.clone()))
}

/// POST /insert/data/:pot_id
///
/// Appends a `{ph, soil}` reading, stamped with the server's wall clock
#[utoipa::path(
    post,
    path = "/insert/data/{pot_id}",
    tag = "data",
    params(("pot_id" = String, Path, description = "Pot id, must be an integer")),
    request_body = ReadingPayload,
    responses(
        (status = 201, description = "Reading stored", body = MessageDto),
        (status = 400, description = "Malformed pot id, payload or missing field", body = MessageDto),
        (status = 404, description = "Unknown pot", body = MessageDto),
        (status = 500, description = "Store failure", body = MessageDto),
    )
)]
pub(super) fn insert_data(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(
            warp::path!("insert" / "data" / String)
                .and(warp::post())
                .and_then(valid_pot_id),
        )
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::content_length_limit(JSON_BODY_LIMIT))
        .and(warp::body::bytes())
        .and_then(
            |service: Arc<PotService>,
             raw_id: String,
             content_type: Option<String>,
             body: Bytes| async move {
                let resp = service
                    .insert_reading(&raw_id, content_type, body)
                    .await
                    .map(|_| MessageDto {
                        message: "Data inserted successfully".to_owned(),
                    });
                build_response(StatusCode::CREATED, resp)
            },
        )
        .boxed()
}

/// GET /find/data/:pot_id?limit=N
///
/// Returns the latest readings of a pot, oldest first
#[utoipa::path(
    get,
    path = "/find/data/{pot_id}",
    tag = "data",
    params(
        ("pot_id" = String, Path, description = "Pot id, must be an integer"),
        ("limit" = Option<usize>, Query, description = "Window size between 1 and 100, defaults to 10"),
    ),
    responses(
        (status = 200, description = "Readings, oldest first", body = [ReadingMessage]),
        (status = 400, description = "Malformed pot id or limit", body = MessageDto),
        (status = 404, description = "Unknown pot", body = MessageDto),
    )
)]
pub(super) fn find_data(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(warp::path!("find" / "data" / String))
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and_then(
            |service: Arc<PotService>, raw_id: String, query: HashMap<String, String>| async move {
                let limit = query.get("limit").map(String::as_str);
                let resp = service.readings(&raw_id, limit).await;
                build_response(StatusCode::OK, resp)
            },
        )
        .boxed()
}
