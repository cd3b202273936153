use super::dto::MessageDto;
use super::image_routes::ImageUploadedDto;
use super::metric_routes::HealthyDto;
use super::user_routes::RegisteredDto;
use super::{data_routes, image_routes, metric_routes, user_routes};
use smartpot_core::{ReadingMessage, ReadingPayload, RegisterPayload, RegistrationOutcome};
use utoipa::OpenApi;
use warp::Filter;

#[derive(OpenApi)]
#[openapi(
    paths(
        user_routes::insert_user,
        user_routes::find_user,
        image_routes::post_image,
        image_routes::get_image,
        data_routes::insert_data,
        data_routes::find_data,
        metric_routes::health,
    ),
    components(schemas(
        MessageDto,
        RegisterPayload,
        RegisteredDto,
        RegistrationOutcome,
        ImageUploadedDto,
        ReadingPayload,
        ReadingMessage,
        HealthyDto,
    )),
    tags(
        (name = "user", description = "Accounts and their pots"),
        (name = "image", description = "Pot images"),
        (name = "data", description = "Sensor readings"),
        (name = "metric", description = "Service state"),
    )
)]
pub struct ApiDoc;

/// GET /api/doc/api.json
pub fn routes() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let api = ApiDoc::openapi();
    warp::path!("api" / "doc" / "api.json")
        .and(warp::get())
        .map(move || warp::reply::json(&api))
}
