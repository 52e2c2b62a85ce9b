use std::future::Future;
use std::io::Error;
use std::net::SocketAddr;
use std::time::Instant;

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::{middleware, routing::get, Extension, Router};
use db_explorer_database::client::ExplorerDbClient;
use log::{debug, info, trace, Level};
use tower_http::cors::{Any, CorsLayer};
use utoipa::openapi;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::{Config, SwaggerUi};

use crate::service::catalog::TableCatalogService;
use crate::service::matching_summary::MatchingSummaryService;
use crate::service::table_page::TablePageService;
use crate::settings::Settings;
use crate::web::endpoint;
use crate::web::endpoint::health::StartedAt;
use crate::web::endpoint::{health, matching_summary, table_page, tables};

pub const TABLES_TAG: &str = "tables";
pub const MATCHING_TAG: &str = "matching";
pub const INFO_TAG: &str = "info";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Database Explorer REST API",
        description = "Read-only access to the tables of a PostgreSQL schema and the matching donation summary",
    ),
    paths(
        endpoint::tables::get_tables,
        endpoint::table_page::get_table_page,
        endpoint::matching_summary::get_matching_summary,
        endpoint::health::get_health,
    ),
    tags(
        (name = TABLES_TAG, description = "Table browsing endpoints"),
        (name = MATCHING_TAG, description = "Matching donation endpoints"),
        (name = INFO_TAG, description = "Info API endpoints"),
    ),
)]
struct ApiDoc;

pub struct WebServer {
    settings: Settings,
    database_client: ExplorerDbClient,
}

impl WebServer {
    pub fn new(settings: Settings, database_client: ExplorerDbClient) -> Self {
        WebServer { settings, database_client }
    }

    pub fn router(&self) -> Router {
        let base_path = self.settings.cli_args.base_path.trim_end_matches('/');

        let (api_router, api) = OpenApiRouter::with_openapi(set_server_path(base_path))
            .route(&format!("{}{}", base_path, tables::PATH), get(tables::get_tables))
            .route(&format!("{}{}", base_path, table_page::PATH), get(table_page::get_table_page))
            .route(&format!("{}{}", base_path, matching_summary::PATH), get(matching_summary::get_matching_summary))
            .route(&format!("{}{}", base_path, health::PATH), get(health::get_health))
            .split_for_parts();
        let swagger_config = Config::default().use_base_layout().try_it_out_enabled(true).display_request_duration(true);
        let swagger =
            SwaggerUi::new(format!("{}/api", base_path)).url(format!("{}/api/openapi.json", base_path), api).config(swagger_config);

        Router::new()
            .merge(api_router)
            .merge(swagger)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(middleware::from_fn(add_default_cache_control))
            .layer(middleware::from_fn(log_responses))
            .layer(middleware::from_fn(log_requests))
            .layer(Extension(TableCatalogService::new(self.database_client.clone())))
            .layer(Extension(TablePageService::new(self.database_client.clone())))
            .layer(Extension(MatchingSummaryService::new(self.database_client.clone())))
            .layer(Extension(self.database_client.clone()))
            .layer(Extension(StartedAt(Instant::now())))
    }

    pub async fn run<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listen = &self.settings.cli_args.listen;
        let base_path = self.settings.cli_args.base_path.trim_end_matches('/');
        let app = self.router();

        info!("Starting web server listener on {}, api path: {}/api", listen, base_path);
        let listener = tokio::net::TcpListener::bind(listen).await?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Web server shutdown")
            })
            .await
    }
}

async fn add_default_cache_control(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    if !response.headers().contains_key(header::CACHE_CONTROL) {
        // Row counts are live, never serve them from a cache without revalidating
        response.headers_mut().insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }
    response
}

async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();
    let response = next.run(req).await;
    debug!("{} {} -> {} ({} ms)", method, uri, response.status().as_u16(), started.elapsed().as_millis());
    response
}

async fn log_responses(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    if log::log_enabled!(Level::Trace) {
        let original_body = std::mem::take(response.body_mut());
        if let Ok(body_bytes) = to_bytes(original_body, usize::MAX).await {
            let body_string = String::from_utf8_lossy(&body_bytes);
            let truncated_body: String = if body_string.chars().count() > 1000 {
                format!("{}[...]", body_string.chars().take(1000).collect::<String>())
            } else {
                body_string.to_string()
            };
            trace!("Response: {} - {}", response.status(), truncated_body);
            *response.body_mut() = Body::from(body_bytes);
        }
    }
    response
}

pub fn set_server_path(base_path: &str) -> openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    if base_path.trim_end_matches('/') != "" {
        openapi.servers = Some(vec![openapi::ServerBuilder::new().url(base_path).build()]);
    }
    openapi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_endpoint() {
        let openapi = set_server_path("");
        for path in [tables::PATH, table_page::PATH, matching_summary::PATH, health::PATH] {
            assert!(openapi.paths.paths.contains_key(path), "{path} missing from OpenAPI document");
        }
        assert!(openapi.servers.is_none());
    }

    #[test]
    fn openapi_server_uses_base_path() {
        let openapi = set_server_path("/explorer/");
        let servers = openapi.servers.expect("servers");
        assert_eq!(servers[0].url, "/explorer/");
    }
}
