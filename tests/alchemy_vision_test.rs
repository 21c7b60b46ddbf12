#![cfg(feature = "alchemy-vision")]

use serde_json::json;
use watson_sdk::error::ServiceError;
use watson_sdk::service::{AlchemyRequest, AlchemyVision, ImageInput};
use watson_sdk::traits::Service;
use wiremock::matchers::{body_bytes, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn client(server: &MockServer) -> AlchemyVision {
    common::init_tracing();
    AlchemyVision::with_api_key("av-key").with_endpoint(&server.uri())
}

#[tokio::test]
async fn image_keywords_post_raw_bytes() {
    let server = MockServer::start().await;
    let image = vec![0xffu8, 0xd8, 0xff, 0xe0, 0x00, 0x10];
    Mock::given(method("POST"))
        .and(path("/image/ImageGetRankedImageKeywords"))
        .and(query_param("apikey", "av-key"))
        .and(query_param("imagePostMode", "raw"))
        .and(query_param("outputMode", "json"))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_bytes(image.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "imageKeywords": [
                { "text": "dog", "score": "0.97" },
                { "text": "animal", "score": "0.88" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let keywords = client(&server)
        .get_image_keywords(&AlchemyRequest::image(ImageInput::bytes("dog.jpg", image)))
        .await
        .unwrap();

    assert_eq!(keywords.image_keywords.len(), 2);
    assert_eq!(keywords.image_keywords[0].text.as_deref(), Some("dog"));
    assert_eq!(keywords.image_keywords[0].score, Some(0.97));
}

#[tokio::test]
async fn image_keywords_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/image/ImageGetRankedImageKeywords"))
        .and(body_bytes(b"GIF89a".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "imageKeywords": [{ "text": "NO_TAGS", "score": "0" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("blank.gif");
    std::fs::write(&file, b"GIF89a").unwrap();

    let keywords = client(&server)
        .get_image_keywords(&AlchemyRequest::image(ImageInput::file(&file)))
        .await
        .unwrap();
    assert_eq!(keywords.image_keywords[0].text.as_deref(), Some("NO_TAGS"));
}

#[tokio::test]
async fn faces_by_url_are_form_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url/URLGetRankedImageFaceTags"))
        .and(body_string_contains("url=http%3A%2F%2Fexample.com%2Fobama.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "url": "http://example.com/obama.jpg",
            "imageFaces": [{
                "age": { "ageRange": "55-64", "score": "0.45" },
                "gender": { "gender": "MALE", "score": "0.99" },
                "identity": { "name": "Barack Obama", "score": "0.97" },
                "height": "140",
                "width": "140",
                "positionX": "220",
                "positionY": "50"
            }]
        })))
        .mount(&server)
        .await;

    let faces = client(&server)
        .recognize_faces(&AlchemyRequest::url("http://example.com/obama.jpg"))
        .await
        .unwrap();
    let face = &faces.image_faces[0];
    assert_eq!(face.age.as_ref().and_then(|a| a.age_range.as_deref()), Some("55-64"));
    assert_eq!(face.gender.as_ref().and_then(|g| g.score), Some(0.99));
    assert_eq!(face.position_x.as_deref(), Some("220"));
}

#[tokio::test]
async fn image_link_from_page() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url/URLGetImage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "url": "https://example.com/article",
            "image": "https://example.com/lead.jpg"
        })))
        .mount(&server)
        .await;

    let link = client(&server)
        .get_image_link(&AlchemyRequest::url("https://example.com/article"))
        .await
        .unwrap();
    assert_eq!(link.image.as_deref(), Some("https://example.com/lead.jpg"));
}

#[tokio::test]
async fn in_band_error_is_bad_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/url/URLGetImage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ERROR",
            "statusInfo": "cannot-retrieve:http-404"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_image_link(&AlchemyRequest::url("https://example.com/gone"))
        .await
        .unwrap_err();
    match err {
        ServiceError::BadRequest(message) => assert_eq!(message, "cannot-retrieve:http-404"),
        e => panic!("Expected BadRequest, got: {}", e),
    }
}

#[tokio::test]
async fn scene_text_from_raw_image() {
    let server = MockServer::start().await;
    let image = b"\x89PNG".to_vec();
    Mock::given(method("POST"))
        .and(path("/image/ImageGetRankedImageSceneText"))
        .and(query_param("imagePostMode", "raw"))
        .and(body_bytes(image.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "sceneText": "STOP",
            "sceneTextLines": [{
                "confidence": "0.91",
                "text": "STOP",
                "region": { "x": "12", "y": 40, "width": "80", "height": "30" },
                "words": [{ "text": "STOP", "confidence": 0.91 }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client(&server)
        .get_image_scene_text(&AlchemyRequest::image(ImageInput::bytes("sign.png", image)))
        .await
        .unwrap();
    assert_eq!(text.scene_text.as_deref(), Some("STOP"));
    let line = &text.scene_text_lines[0];
    assert_eq!(line.confidence, Some(0.91));
    assert_eq!(line.region.as_ref().and_then(|r| r.x), Some(12));
    assert_eq!(line.region.as_ref().and_then(|r| r.y), Some(40));
    assert_eq!(line.words.len(), 1);
}
