use actix_web::http::{header, Method};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::errors::AppError;
use crate::models::employee::EmployeeStats;
use crate::state::AppState;
use crate::utils::filter::EmployeeFilter;
use crate::utils::navigation::{self, Navigation, Page};

fn redirect(target: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}

/// Serves every path not claimed by the API: the login, dashboard and
/// employee list views, plus redirects for everything else.
pub async fn page_handler(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return Err(AppError::NotFound("Route not found".to_string()).into());
    }

    let authenticated = state.session.is_authenticated();
    let page = match navigation::resolve(req.path(), authenticated) {
        Navigation::Redirect(target) => return Ok(redirect(target)),
        Navigation::Render(page) => page,
    };

    match page {
        Page::Login => Ok(HttpResponse::Ok().json(json!({
            "page": page.name(),
            "authenticated": authenticated,
        }))),
        Page::Dashboard => {
            state.seeder.ensure_seeded().await;
            let stats = EmployeeStats::from_records(&state.employees.list_all());
            Ok(HttpResponse::Ok().json(json!({
                "page": page.name(),
                "stats": stats,
            })))
        }
        Page::Employees => {
            let filter = web::Query::<EmployeeFilter>::from_query(req.query_string())
                .map_err(|err| AppError::BadRequest(err.to_string()))?
                .into_inner();
            state.seeder.ensure_seeded().await;
            let employees = filter.apply(&state.employees.list_all());
            Ok(HttpResponse::Ok().json(json!({
                "page": page.name(),
                "filter": filter,
                "employees": employees,
            })))
        }
    }
}
