use crate::connectors::AuthServiceConnector;
use crate::forms;
use crate::helpers::JsonResponse;
use crate::services::entitlement::{self, RecordError};
use crate::services::usage_store::UsageStore;
use actix_web::{post, web, HttpRequest, Responder, Result};
use chrono::Utc;
use serde_valid::Validate;
use std::sync::Arc;

#[tracing::instrument(name = "Record usage.", skip(req, form, connector, store))]
#[post("/record")]
pub async fn record_handler(
    req: HttpRequest,
    form: web::Json<forms::UsageEvent>,
    connector: web::Data<Arc<dyn AuthServiceConnector>>,
    store: web::Data<Arc<dyn UsageStore>>,
) -> Result<impl Responder> {
    if let Err(errors) = form.validate() {
        return Ok(web::Json(JsonResponse::error(400, &errors.to_string())));
    }

    let Some(user) = super::resolve_user(&req, connector.get_ref().as_ref()).await else {
        return Ok(web::Json(JsonResponse::error(401, "no active session")));
    };

    match entitlement::record_usage(
        store.get_ref().as_ref(),
        &user,
        &form.section,
        form.action,
        Utc::now().date_naive(),
    )
    .await
    {
        Ok(counter) => Ok(web::Json(JsonResponse::ok(counter, "Recorded"))),
        Err(RecordError::NoCounter) => Ok(web::Json(JsonResponse::error(
            409,
            "no usage counter exists for the current week",
        ))),
        Err(RecordError::Store(err)) => {
            tracing::error!("Failed to record usage: {:?}", err);
            Ok(web::Json(JsonResponse::error(500, "Internal Server Error")))
        }
    }
}
