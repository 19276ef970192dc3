pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod mail;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_scalar::{Scalar, Servable as ScalarServable};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::handlers::{health, media};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "DatoDirecto API",
        version = "1.0.0",
        description = "Content API behind the DatoDirecto site and its admin panel"
    ),
    tags(
        (name = "Site", description = "Public content read by the site pages"),
        (name = "Contact", description = "Public contact form"),
        (name = "Auth", description = "Authentication"),
        (name = "Users", description = "Admin account management"),
        (name = "Hero Slides", description = "Landing-page carousel"),
        (name = "Services", description = "Services catalog"),
        (name = "Templates", description = "Portfolio templates and their keywords"),
        (name = "Categories", description = "Template categories"),
        (name = "Keywords", description = "Template keywords"),
        (name = "Testimonials", description = "Customer testimonials"),
        (name = "Team", description = "Team members"),
        (name = "Clients", description = "Client logos"),
        (name = "Values", description = "Corporate values"),
        (name = "Social Links", description = "Footer social links"),
        (name = "Payment Methods", description = "Accepted payment methods"),
        (name = "About", description = "About-us section"),
        (name = "BI", description = "Business-intelligence landing page"),
        (name = "Media", description = "Public image bucket"),
        (name = "Messages", description = "Received contact messages"),
        (name = "Health", description = "Liveness"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// `"*"` allows any origin; otherwise only the listed origins.
fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let allow_origin = if cfg.allow_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allow_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(cfg.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", routes::api_routes(&state.config))
        .routes(routes!(media::serve_image))
        .routes(routes!(health::health))
        .split_for_parts();

    router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api.clone()))
        .merge(Scalar::with_url("/scalar", api))
        .fallback(health::not_found)
        .layer(cors)
}
