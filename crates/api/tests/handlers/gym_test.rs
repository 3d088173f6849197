use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use gymdesk_api::services::image_store::{ImageStore, ImageUpload};
use gymdesk_core::{
    errors::GymResult,
    models::gym::{GymDetails, QrCodeResponse},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::test_utils::{GYM_CODE, GYM_NAME, TestContext};

/// Accepts every upload and remembers where it went.
#[derive(Default)]
struct RecordingImageStore {
    uploads: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, folder: &str, image: ImageUpload) -> GymResult<String> {
        self.uploads
            .lock()
            .unwrap()
            .push((folder.to_string(), image.extension.clone()));
        Ok(format!("https://images.test/{}/{}", folder, image.file_name))
    }
}

fn logo_form(field: &str, file_name: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        field,
        Part::bytes(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
            .file_name(file_name)
            .mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_get_gym_details() {
    let ctx = TestContext::new().await;

    let response = ctx.as_admin(ctx.server.get("/api/admin/gym-details")).await;

    response.assert_status_ok();
    let gym: GymDetails = response.json();
    assert_eq!(gym.name, GYM_NAME);
    assert_eq!(gym.gym_code, GYM_CODE);
}

#[tokio::test]
async fn test_gym_details_missing_until_first_save() {
    let ctx = TestContext::without_gym().await;

    ctx.as_admin(ctx.server.get("/api/admin/gym-details"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    ctx.as_admin(ctx.server.get("/api/admin/gym-details/qr-code"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_first_save_requires_name() {
    let ctx = TestContext::without_gym().await;

    let response = ctx
        .as_admin(ctx.server.put("/api/admin/gym-details"))
        .json(&json!({ "address": "MG Road" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Gym name is required");
    ctx.as_admin(ctx.server.get("/api/admin/gym-details"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_first_save_creates_gym_with_fresh_code() {
    let ctx = TestContext::without_gym().await;

    let response = ctx
        .as_admin(ctx.server.put("/api/admin/gym-details"))
        .json(&json!({ "name": "  Pulse Fitness ", "mobile": "9800000000" }))
        .await;
    response.assert_status_ok();
    let created: GymDetails = response.json();

    assert_eq!(created.name, "Pulse Fitness");
    assert_eq!(created.mobile.as_deref(), Some("9800000000"));
    assert_eq!(created.gym_code.len(), 16);
    assert!(created.gym_code.chars().all(|c| c.is_ascii_alphanumeric()));

    let qr: QrCodeResponse = ctx
        .as_admin(ctx.server.get("/api/admin/gym-details/qr-code"))
        .await
        .json();
    assert_eq!(qr.gym_id, created.gym_code);
    assert_eq!(qr.gym_name, "Pulse Fitness");
}

#[tokio::test]
async fn test_update_keeps_code_and_unsent_fields() {
    let ctx = TestContext::new().await;
    ctx.as_admin(ctx.server.put("/api/admin/gym-details"))
        .json(&json!({ "address": "MG Road" }))
        .await
        .assert_status_ok();

    let response = ctx
        .as_admin(ctx.server.put("/api/admin/gym-details"))
        .json(&json!({ "email": "desk@irontemple.in" }))
        .await;
    response.assert_status_ok();
    let gym: GymDetails = response.json();

    assert_eq!(gym.name, GYM_NAME);
    assert_eq!(gym.gym_code, GYM_CODE);
    assert_eq!(gym.address.as_deref(), Some("MG Road"));
    assert_eq!(gym.email.as_deref(), Some("desk@irontemple.in"));
}

#[tokio::test]
async fn test_update_rejects_blank_name() {
    let ctx = TestContext::new().await;

    ctx.as_admin(ctx.server.put("/api/admin/gym-details"))
        .json(&json!({ "name": "  " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logo_upload_without_image_host_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/gym-details/logo"))
        .multipart(logo_form("logo", "logo.png"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let gym: GymDetails = ctx
        .as_admin(ctx.server.get("/api/admin/gym-details"))
        .await
        .json();
    assert!(gym.logo_url.is_none());
}

#[tokio::test]
async fn test_logo_upload_requires_logo_field() {
    let images = Arc::new(RecordingImageStore::default());
    let ctx = TestContext::with_images(images.clone()).await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/gym-details/logo"))
        .multipart(logo_form("photo", "logo.png").add_text("note", "front desk"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "No logo file was uploaded");
    assert!(images.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_logo_upload_rejects_unsupported_format() {
    let images = Arc::new(RecordingImageStore::default());
    let ctx = TestContext::with_images(images.clone()).await;

    ctx.as_admin(ctx.server.post("/api/admin/gym-details/logo"))
        .multipart(logo_form("logo", "logo.gif"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    assert!(images.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_logo_upload_stores_hosted_url() {
    let images = Arc::new(RecordingImageStore::default());
    let ctx = TestContext::with_images(images.clone()).await;

    let response = ctx
        .as_admin(ctx.server.post("/api/admin/gym-details/logo"))
        .multipart(logo_form("logo", "Logo.PNG"))
        .await;
    response.assert_status_ok();

    let gym: GymDetails = response.json();
    assert_eq!(gym.logo_url.as_deref(), Some("https://images.test/gym/Logo.PNG"));
    assert_eq!(
        *images.uploads.lock().unwrap(),
        vec![("gym".to_string(), "png".to_string())]
    );

    let qr: QrCodeResponse = ctx
        .as_admin(ctx.server.get("/api/admin/gym-details/qr-code"))
        .await
        .json();
    assert_eq!(qr.logo_url, gym.logo_url);
}

#[tokio::test]
async fn test_gym_details_are_admin_only() {
    let ctx = TestContext::new().await;

    ctx.as_member(ctx.server.get("/api/admin/gym-details"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
