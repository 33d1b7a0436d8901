use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionResponse {
    authenticated: bool,
}

pub async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.login(payload.email.trim(), &payload.password)?;
    Ok(HttpResponse::Ok().json(SessionResponse { authenticated: true }))
}

pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, actix_web::Error> {
    state.session.logout()?;
    Ok(HttpResponse::Ok().json(SessionResponse { authenticated: false }))
}
