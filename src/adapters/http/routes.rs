use axum::{
    extract::{Multipart, State},
    Json,
};
use image::RgbImage;

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::application::dto::{
    ImagesResponse, ModelsResponse, PredictByIdRequest, RootResponse, StatusResponse,
};
use crate::domain::{
    description::{DescribeRequest, Description},
    errors::DomainError,
    prediction::PredictionResult,
};

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Mask2Former ADE20K API".into(),
        docs: "/docs".into(),
    })
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok".into() })
}

pub async fn list_models(State(st): State<HttpState>) -> Json<ModelsResponse> {
    Json(ModelsResponse { models: st.models.list_models() })
}

pub async fn list_test_images(State(st): State<HttpState>) -> Result<Json<ImagesResponse>, ApiError> {
    let images = st.catalog.list_images()?;
    Ok(Json(ImagesResponse { images }))
}

/// Runs the CPU-bound pipeline off the async workers.
async fn run_predictor(st: &HttpState, image: RgbImage, model_key: String) -> Result<PredictionResult, ApiError> {
    let predictor = st.predictor.clone();
    let result = tokio::task::spawn_blocking(move || predictor.predict(&image, &model_key))
        .await
        .map_err(|e| DomainError::OperationFailed(format!("prediction task aborted: {e}")))??;
    Ok(result)
}

pub async fn predict(State(st): State<HttpState>, mut multipart: Multipart) -> Result<Json<PredictionResult>, ApiError> {
    let mut upload: Option<Vec<u8>> = None;
    let mut model_key = st.default_model_key.clone();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let is_image = field
                    .content_type()
                    .map(|ct| ct.starts_with("image/"))
                    .unwrap_or(false);
                if !is_image {
                    return Err(DomainError::InvalidInput("Upload an image file".into()).into());
                }
                upload = Some(field.bytes().await?.to_vec());
            }
            Some("model_key") => {
                let key = field.text().await?;
                if !key.trim().is_empty() {
                    model_key = key.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let raw = upload.ok_or_else(|| DomainError::InvalidInput("Upload an image file".into()))?;
    let image = image::load_from_memory(&raw)
        .map_err(|_| DomainError::InvalidInput("Invalid image".into()))?
        .to_rgb8();

    Ok(Json(run_predictor(&st, image, model_key).await?))
}

pub async fn predict_by_id(
    State(st): State<HttpState>,
    Json(req): Json<PredictByIdRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let catalog = st.catalog.clone();
    let image_id = req.image_id.clone();
    let image = tokio::task::spawn_blocking(move || catalog.load_image(&image_id))
        .await
        .map_err(|e| DomainError::OperationFailed(format!("image load aborted: {e}")))??;

    let model_key = st.default_model_key.clone();
    Ok(Json(run_predictor(&st, image, model_key).await?))
}

pub async fn describe(
    State(st): State<HttpState>,
    Json(req): Json<DescribeRequest>,
) -> Result<Json<Description>, ApiError> {
    Ok(Json(st.description.describe(&req).await?))
}
