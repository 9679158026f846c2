// File: services/coachly_backend/src/main.rs
use axum::{routing::get, Router};
use coachly_config::load_config;
use coachly_db::{schema, DbClient, SqlBookingStore, SqlNotificationStore, SqlRoster};
use coachly_scheduling::handlers::SchedulingState;
use coachly_scheduling::routes as scheduling_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

mod service_factory;
use service_factory::CoachlyProviderFactory;

#[tokio::main]
async fn main() {
    coachly_common::logging::init();

    let config = Arc::new(load_config().expect("Failed to load config"));

    // Storage is not optional for the scheduling engine: the commit path
    // needs a transactional booking table.
    let db_client = DbClient::new(&config)
        .await
        .expect("Failed to connect to the database");
    schema::init_schema(&db_client)
        .await
        .expect("Failed to initialize database schema");

    let store = Arc::new(SqlBookingStore::new(db_client.clone()));
    let roster = Arc::new(SqlRoster::new(db_client.clone()));
    let notifier: Option<Arc<dyn coachly_common::services::NotificationService>> =
        if config.use_notifications {
            Some(Arc::new(SqlNotificationStore::new(db_client.clone())))
        } else {
            None
        };

    let providers = Arc::new(CoachlyProviderFactory::new(&config, notifier));

    let scheduling_state = Arc::new(SchedulingState {
        config: config.clone(),
        store,
        roster,
        providers,
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Coachly API!" }))
        .merge(coachly_common::routes::routes())
        .merge(scheduling_routes::routes(scheduling_state));

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", api_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use coachly_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Coachly API",
                version = "0.1.0",
                description = "Coachly scheduling service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags((name = "Coachly", description = "Core service endpoints")),
            servers((url = "/api", description = "Main API prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // Serve the SPA bundle in dev mode
    if cfg!(debug_assertions) {
        info!("Running in development mode, serving static files from ./dist");
        app = app.fallback_service(ServeDir::new("dist"));
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
