use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::db::SaveOutcome;
use crate::errors::AppError;
use crate::models::employee::EmployeeStats;
use crate::state::AppState;
use crate::utils::filter::EmployeeFilter;
use crate::utils::validation::EmployeeForm;

pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<EmployeeFilter>,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    let employees = query.apply(&state.employees.list_all());
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    let id = id.into_inner();
    let employee = state
        .employees
        .find(&id)
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Creates or updates, depending on whether the submitted `id` is known.
pub async fn save_employee(
    state: web::Data<AppState>,
    form: web::Json<EmployeeForm>,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    let employee = form
        .into_inner()
        .into_employee(state.image_rule)
        .map_err(AppError::Validation)?;

    match state.employees.upsert(employee).map_err(AppError::from)? {
        SaveOutcome::Updated(saved) => Ok(HttpResponse::Ok().json(saved)),
        SaveOutcome::Created(saved) => Ok(HttpResponse::Created().json(saved)),
    }
}

/// Unknown ids succeed too; the list simply does not contain them.
pub async fn delete_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    state.employees.remove(&id.into_inner()).map_err(AppError::from)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully",
    })))
}

pub async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse, actix_web::Error> {
    state.session.require()?;

    let stats = EmployeeStats::from_records(&state.employees.list_all());
    Ok(HttpResponse::Ok().json(stats))
}
