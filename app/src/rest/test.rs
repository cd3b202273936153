use super::*;
use crate::pot::mock::build_mocked_service;

#[tokio::test]
async fn test_unknown_route() {
    let mocked = build_mocked_service();
    let routes = api(&mocked.service, 1024);

    let res = warp::test::request()
        .path("/insert/nothing")
        .reply(&routes)
        .await;

    assert_eq!(404, res.status());
    let body: dto::MessageDto = serde_json::from_slice(res.body()).unwrap();
    assert_eq!("Not found", body.message);
}

#[tokio::test]
async fn test_wrong_method() {
    let mocked = build_mocked_service();
    let routes = api(&mocked.service, 1024);

    let res = warp::test::request()
        .method("GET")
        .path("/insert/user")
        .reply(&routes)
        .await;

    assert_eq!(405, res.status());
}

#[tokio::test]
async fn test_dependency_failure_hides_cause() {
    let mocked = build_mocked_service();
    mocked.store.set_available(false);
    let routes = api(&mocked.service, 1024);

    let res = warp::test::request()
        .path("/find/data/1")
        .reply(&routes)
        .await;

    assert_eq!(500, res.status());
    let body: dto::MessageDto = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(INTERNAL_ERROR_MESSAGE, body.message);
}

#[test]
fn test_error_status_mapping() {
    let cases: Vec<(ServiceError, u16)> = vec![
        (ValidationError::EmptyImage.into(), 400),
        (ValidationError::PotClaimed(1).into(), 409),
        (crate::error::NotFoundError::Pot(1).into(), 404),
        (
            crate::error::DBError::Unavailable("down".to_owned()).into(),
            500,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(status, error_response(err).status().as_u16());
    }
}
