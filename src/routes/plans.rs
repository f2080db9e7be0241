use crate::helpers::JsonResponse;
use crate::models::plan::{PlanDefinition, PLAN_CATALOGUE};
use actix_web::{get, web, Responder, Result};

/// Public plan catalogue; the checkout page renders from this
#[tracing::instrument(name = "List subscription plans.")]
#[get("")]
pub async fn list_handler() -> Result<impl Responder> {
    let plans: Vec<PlanDefinition> = PLAN_CATALOGUE.clone();
    Ok(web::Json(JsonResponse::ok_list(plans)))
}
