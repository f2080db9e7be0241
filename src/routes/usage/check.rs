use crate::connectors::AuthServiceConnector;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::models::UsageCounter;
use crate::services::entitlement;
use crate::services::usage_store::UsageStore;
use actix_web::{post, web, HttpRequest, Responder, Result};
use chrono::Utc;
use serde_derive::Serialize;
use serde_valid::Validate;
use std::sync::Arc;

#[derive(Serialize)]
pub struct UsageCheckResult {
    pub allowed: bool,
    /// Stable reason code when denied, e.g. "weekly_speech_limit_reached"
    pub reason: Option<&'static str>,
    pub counter: Option<UsageCounter>,
}

#[tracing::instrument(name = "Check usage quota.", skip(req, form, connector, store))]
#[post("/check")]
pub async fn check_handler(
    req: HttpRequest,
    form: web::Json<forms::UsageEvent>,
    connector: web::Data<Arc<dyn AuthServiceConnector>>,
    store: web::Data<Arc<dyn UsageStore>>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Ok(web::Json(JsonResponse::error(400, &errors.to_string())));
    }

    let user = super::resolve_user(&req, connector.get_ref().as_ref()).await;
    let decision = entitlement::check_usage(
        store.get_ref().as_ref(),
        user.as_ref(),
        &form.section,
        form.action,
        Utc::now().date_naive(),
    )
    .await;

    let response = match decision.reason {
        None => JsonResponse::ok(
            UsageCheckResult {
                allowed: true,
                reason: None,
                counter: decision.counter,
            },
            "Allowed",
        ),
        Some(reason) => JsonResponse::error_with(
            reason.http_code(),
            &reason.to_string(),
            UsageCheckResult {
                allowed: false,
                reason: Some(reason.code()),
                counter: decision.counter,
            },
        ),
    };
    Ok(web::Json(response))
}
