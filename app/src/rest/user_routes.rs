pub use self::dto::RegisteredDto;
use super::dto::MessageDto;
use super::{build_response, JSON_BODY_LIMIT};
use crate::pot::PotService;
use bytes::Bytes;
use smartpot_core::RegisterPayload;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::Filter;

pub fn routes(
    service: &Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    insert_user(service.clone()).or(find_user(service.clone()))
}

/// POST /insert/user
///
/// Registers a pot for an account and seeds the pot's placeholder image
///
/// Returns 201 with a `RegisteredDto`, telling whether the account was
/// created, extended or already held the pot
#[utoipa::path(
    post,
    path = "/insert/user",
    tag = "user",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Pot registered", body = RegisteredDto),
        (status = 400, description = "Malformed body or missing field", body = MessageDto),
        (status = 409, description = "Pot belongs to another account", body = MessageDto),
        (status = 500, description = "Store or asset failure", body = MessageDto),
    )
)]
pub(super) fn insert_user(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(warp::path!("insert" / "user"))
        .and(warp::post())
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::content_length_limit(JSON_BODY_LIMIT))
        .and(warp::body::bytes())
        .and_then(
            |service: Arc<PotService>, content_type: Option<String>, body: Bytes| async move {
                let resp = service
                    .register_pot(content_type, body)
                    .await
                    .map(|outcome| RegisteredDto {
                        message: outcome.message().to_owned(),
                        outcome,
                    });
                build_response(StatusCode::CREATED, resp)
            },
        )
        .boxed()
}

/// GET /find/user/:chat_id
///
/// Returns the ascending pot ids of an account
#[utoipa::path(
    get,
    path = "/find/user/{chat_id}",
    tag = "user",
    params(("chat_id" = String, Path, description = "Account id, must be an integer")),
    responses(
        (status = 200, description = "Pot ids of the account", body = [i64]),
        (status = 400, description = "Malformed account id", body = MessageDto),
        (status = 404, description = "Unknown account", body = MessageDto),
    )
)]
pub(super) fn find_user(
    service: Arc<PotService>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::any()
        .map(move || service.clone())
        .and(warp::path!("find" / "user" / String))
        .and(warp::get())
        .and_then(|service: Arc<PotService>, raw_id: String| async move {
            let resp = service.user_pots(&raw_id).await;
            build_response(StatusCode::OK, resp)
        })
        .boxed()
}

pub mod dto {
    use serde::{Deserialize, Serialize};
    use smartpot_core::RegistrationOutcome;
    use utoipa::ToSchema;

    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct RegisteredDto {
        pub message: String,
        pub outcome: RegistrationOutcome,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pot::mock::build_mocked_service;
    use smartpot_core::RegistrationOutcome;

    async fn post_user(service: &Arc<PotService>, body: &str) -> warp::http::Response<Bytes> {
        warp::test::request()
            .method("POST")
            .path("/insert/user")
            .header("content-type", "application/json")
            .body(body.to_owned())
            .reply(&routes(service))
            .await
    }

    #[tokio::test]
    async fn test_rest_insert_user() {
        // Prepare
        let mocked = build_mocked_service();

        // Execute
        let first = post_user(&mocked.service, r#"{"chat_id": 5123456789, "pot_id": 1}"#).await;
        let second = post_user(&mocked.service, r#"{"chat_id": 5123456789, "pot_id": 1}"#).await;

        // Validate
        assert_eq!(201, first.status());
        let body: RegisteredDto = serde_json::from_slice(first.body()).unwrap();
        assert_eq!(RegistrationOutcome::Created, body.outcome);
        assert_eq!("User saved successfully", body.message);

        assert_eq!(201, second.status());
        let body: RegisteredDto = serde_json::from_slice(second.body()).unwrap();
        assert_eq!(RegistrationOutcome::AlreadyAssociated, body.outcome);
    }

    #[tokio::test]
    async fn test_rest_insert_user_invalid() {
        let mocked = build_mocked_service();
        let routes = routes(&mocked.service);

        let missing = post_user(&mocked.service, r#"{"chat_id": 1}"#).await;
        let malformed = post_user(&mocked.service, "{chat_id").await;
        let plain = warp::test::request()
            .method("POST")
            .path("/insert/user")
            .header("content-type", "text/plain")
            .body(r#"{"chat_id": 1, "pot_id": 2}"#)
            .reply(&routes)
            .await;

        assert_eq!(400, missing.status());
        let body: MessageDto = serde_json::from_slice(missing.body()).unwrap();
        assert!(body.message.contains("pot_id"));
        assert_eq!(400, malformed.status());
        assert_eq!(400, plain.status());
    }

    #[tokio::test]
    async fn test_rest_insert_user_claimed() {
        let mocked = build_mocked_service();

        post_user(&mocked.service, r#"{"chat_id": 1, "pot_id": 7}"#).await;
        let res = post_user(&mocked.service, r#"{"chat_id": 2, "pot_id": 7}"#).await;

        assert_eq!(409, res.status());
        assert_eq!(vec![7], mocked.service.user_pots("1").await.unwrap());
    }

    #[tokio::test]
    async fn test_rest_find_user() {
        let mocked = build_mocked_service();
        let routes = routes(&mocked.service);
        post_user(&mocked.service, r#"{"chat_id": 1, "pot_id": 3}"#).await;
        post_user(&mocked.service, r#"{"chat_id": 1, "pot_id": 2}"#).await;

        let found = warp::test::request()
            .path("/find/user/1")
            .reply(&routes)
            .await;
        let unknown = warp::test::request()
            .path("/find/user/2")
            .reply(&routes)
            .await;
        let malformed = warp::test::request()
            .path("/find/user/bob")
            .reply(&routes)
            .await;

        assert_eq!(200, found.status());
        let pots: Vec<i64> = serde_json::from_slice(found.body()).unwrap();
        assert_eq!(vec![2, 3], pots);
        assert_eq!(404, unknown.status());
        assert_eq!(400, malformed.status());
    }
}
