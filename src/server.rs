use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, HttpServer, get, middleware, post, web};
use futures_util::StreamExt;
use serde_json::json;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::PredictError;
use crate::state::AppState;
use crate::{preprocess, resolver};

pub const LIVENESS_MESSAGE: &str =
    "Prediction API is running. Use POST /predict to upload an image.";

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": LIVENESS_MESSAGE }))
}

#[post("/predict")]
pub async fn predict(
    payload: Multipart,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, PredictError> {
    let bytes = read_image_field(payload, app_state.max_upload_bytes).await?;

    // Decode and inference are blocking; keep them off the async workers.
    let state = app_state.clone();
    let prediction = web::block(move || {
        let batch = preprocess::normalize(&bytes)?;
        let probs = state.model.infer(&batch)?;
        Ok::<_, PredictError>(resolver::resolve(&probs, &state.labels)?)
    })
    .await
    .map_err(|e| PredictError::Canceled(e.to_string()))??;

    info!(
        prediction = %prediction.prediction,
        confidence = prediction.confidence,
        "prediction served"
    );
    Ok(HttpResponse::Ok().json(prediction))
}

/// Pull the uploaded file out of the multipart payload.
///
/// The first part is taken as the file; its declared content type must be an
/// image type. A payload with no parts is the same client error as a
/// non-image one.
async fn read_image_field(mut payload: Multipart, max_bytes: usize) -> Result<Vec<u8>, PredictError> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| PredictError::Upload(e.to_string()))?;
        let is_image = field
            .content_type()
            .map(|ct| ct.type_() == mime::IMAGE)
            .unwrap_or(false);
        if !is_image {
            return Err(PredictError::InvalidInput);
        }

        let mut buf = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| PredictError::Upload(e.to_string()))?;
            if buf.len() + chunk.len() > max_bytes {
                return Err(PredictError::Upload(format!(
                    "file exceeds upload limit of {} bytes",
                    max_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }
        return Ok(buf);
    }
    Err(PredictError::InvalidInput)
}

pub async fn startup(config: ServerConfig, state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(state);

    info!("starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(middleware::Logger::default())
            // Open to every origin for the mobile client; lock this down
            // before exposing the service publicly.
            .wrap(Cors::permissive())
            .app_data(app_state.clone())
            .service(root)
            .service(predict)
    })
    .bind((config.host, config.port))?
    .run()
    .await
}
