use crate::configuration::Settings;
use crate::connectors;
use crate::routes;
use crate::services::usage_store::{PgUsageStore, UsageStore};
use actix_cors::Cors;
use actix_web::{dev::Server, error, http, web, App, HttpServer};
use sqlx::{Pool, Postgres};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    pg_pool: Pool<Postgres>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let auth_service = connectors::init_auth_service(&settings.connectors);

    let usage_store: web::Data<Arc<dyn UsageStore>> =
        web::Data::new(Arc::new(PgUsageStore::new(pg_pool.clone())));

    let settings = web::Data::new(settings);
    let pg_pool = web::Data::new(pg_pool);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg = format!("{{\"kind\":\"payload\",\"msg\":\"{}\"}}", err);
        error::InternalError::new(msg, http::StatusCode::BAD_REQUEST).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(web::scope("/plans").service(routes::plans::list_handler))
            .service(
                web::scope("/usage")
                    .service(routes::usage::check_handler)
                    .service(routes::usage::record_handler),
            )
            .app_data(json_config.clone())
            .app_data(pg_pool.clone())
            .app_data(auth_service.clone())
            .app_data(usage_store.clone())
            .app_data(settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
