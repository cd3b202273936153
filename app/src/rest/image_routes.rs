pub use self::dto::ImageUploadedDto;
use super::dto::MessageDto;
use super::{build_raw_response, build_response, valid_pot_id};
use crate::pot::PotService;
use bytes::Bytes;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Reply};

pub fn routes(
    service: &Arc<PotService>,
    max_image_bytes: u64,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    post_image(service.clone(), max_image_bytes).or(get_image(service.clone()))
}

/// POST /post/image/:pot_id
///
/// Uploads the raw request body as the pot's image, replacing the old one
#[utoipa::path(
    post,
    path = "/post/image/{pot_id}",
    tag = "image",
    params(("pot_id" = String, Path, description = "Pot id, must be an integer")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image stored", body = ImageUploadedDto),
        (status = 400, description = "Malformed pot id or empty body", body = MessageDto),
        (status = 404, description = "Unknown pot", body = MessageDto),
        (status = 413, description = "Image too large", body = MessageDto),
    )
)]
pub(super) fn post_image(
    service: Arc<PotService>,
    max_image_bytes: u64,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(
            warp::path!("post" / "image" / String)
                .and(warp::post())
                .and_then(valid_pot_id),
        )
        .and(warp::body::content_length_limit(max_image_bytes))
        .and(warp::body::bytes())
        .and_then(
            |service: Arc<PotService>, raw_id: String, body: Bytes| async move {
                let resp = service
                    .upload_image(&raw_id, body)
                    .await
                    .map(|url| ImageUploadedDto {
                        message: "Image uploaded successfully".to_owned(),
                        url,
                    });
                build_response(StatusCode::OK, resp)
            },
        )
        .boxed()
}

/// GET /get/image/:pot_id
///
/// Streams the pot's current image back with a sniffed content type
#[utoipa::path(
    get,
    path = "/get/image/{pot_id}",
    tag = "image",
    params(("pot_id" = String, Path, description = "Pot id, must be an integer")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/jpeg"),
        (status = 404, description = "Unknown pot or missing image", body = MessageDto),
    )
)]
pub(super) fn get_image(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(warp::path!("get" / "image" / String))
        .and(warp::get())
        .and_then(|service: Arc<PotService>, raw_id: String| async move {
            let resp = service.image(&raw_id).await.map(|image| {
                warp::reply::with_header(image.bytes.to_vec(), "content-type", image.content_type)
                    .into_response()
            });
            build_raw_response(resp)
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct ImageUploadedDto {
        pub message: String,
        pub url: String,
    }
}
