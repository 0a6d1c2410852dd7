use super::*;

use st11_core::SENTINEL;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn product(name: &str, thumbnail: &str) -> Product {
    Product {
        url: "/products/1".to_owned(),
        name: name.to_owned(),
        price: "9,900".to_owned(),
        thumbnail: thumbnail.to_owned(),
        thumbnail_local: None,
        registered_date: "2026-08-23".to_owned(),
    }
}

fn fetcher() -> ImageFetcher {
    ImageFetcher::new(5, "st11-test/0.1").unwrap()
}

#[test]
fn sanitize_keeps_alnum_space_underscore() {
    assert_eq!(
        thumbnail_file_name(3, "Mug cup_2 (red)! 100%"),
        "3_Mug cup_2 red 100.jpg"
    );
}

#[test]
fn sanitize_truncates_to_fifty_chars_before_filtering() {
    let name = "a".repeat(80);
    assert_eq!(thumbnail_file_name(1, &name), format!("1_{}.jpg", "a".repeat(50)));
}

#[test]
fn sanitize_keeps_hangul() {
    assert_eq!(thumbnail_file_name(2, "텀블러 500ml"), "2_텀블러 500ml.jpg");
}

#[tokio::test]
async fn successful_download_writes_file_and_sets_local_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/t/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpegbytes".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut products = vec![product("Mug", &format!("{}/t/1.jpg", server.uri()))];

    let (events, _rx) = EventSender::channel();
    let cancel = CancellationToken::new();
    let downloaded = fetcher()
        .download_thumbnails(&mut products, dir.path(), &cancel, &events)
        .await
        .unwrap();

    assert_eq!(downloaded, 1);
    let local = products[0].thumbnail_local.as_deref().unwrap();
    assert!(local.ends_with("1_Mug.jpg"), "unexpected path: {local}");
    assert_eq!(std::fs::read(local).unwrap(), b"jpegbytes");
}

#[tokio::test]
async fn non_200_is_isolated_and_later_items_still_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut products = vec![
        product("First", &format!("{}/missing.jpg", server.uri())),
        product("Second", &format!("{}/ok.jpg", server.uri())),
    ];

    let (events, _rx) = EventSender::channel();
    let cancel = CancellationToken::new();
    let downloaded = fetcher()
        .download_thumbnails(&mut products, dir.path(), &cancel, &events)
        .await
        .unwrap();

    assert_eq!(downloaded, 1);
    assert!(products[0].thumbnail_local.is_none());
    let local = products[1].thumbnail_local.as_deref().unwrap();
    assert!(local.ends_with("2_Second.jpg"), "unexpected path: {local}");
}

#[tokio::test]
async fn sentinel_thumbnails_are_skipped_without_a_request() {
    let dir = tempfile::tempdir().unwrap();
    let mut products = vec![product("No image", SENTINEL)];

    let (events, _rx) = EventSender::channel();
    let cancel = CancellationToken::new();
    let downloaded = fetcher()
        .download_thumbnails(&mut products, dir.path(), &cancel, &events)
        .await
        .unwrap();

    assert_eq!(downloaded, 0);
    assert!(products[0].thumbnail_local.is_none());
}

#[tokio::test]
async fn pre_cancelled_token_downloads_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut products = vec![product("Mug", &format!("{}/t.jpg", server.uri()))];

    let (events, _rx) = EventSender::channel();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let downloaded = fetcher()
        .download_thumbnails(&mut products, dir.path(), &cancel, &events)
        .await
        .unwrap();

    assert_eq!(downloaded, 0);
    assert!(products[0].thumbnail_local.is_none());
}
