use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;
use crate::utils::validation::image_data_uri;

#[derive(Serialize)]
struct ImageUploadResponse {
    uri: String,
}

/// Turns a raw picture upload into the `data:` URI stored on the record.
pub async fn upload_image(
    state: web::Data<AppState>,
    file: web::Bytes,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    let uri = image_data_uri(&file)?;
    Ok(HttpResponse::Ok().json(ImageUploadResponse { uri }))
}
