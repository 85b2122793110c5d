use std::net::SocketAddr;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::{AppConfig, CorsConfig};
use crate::state::AppState;
use crate::{maintenance, users};

pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);
    Router::new()
        .merge(maintenance::router())
        .merge(users::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// A `*` entry allows everything. With credentials enabled the request's own
/// value is mirrored instead, since browsers reject a literal wildcard there.
pub fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let wildcard = |list: &[String]| list.iter().any(|v| v == "*");

    let origins = if wildcard(&cfg.allow_origins) {
        if cfg.allow_credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        AllowOrigin::list(cfg.allow_origins.iter().filter_map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| warn!(origin = %o, error = %e, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    let methods = if wildcard(&cfg.allow_methods) {
        if cfg.allow_credentials {
            AllowMethods::mirror_request()
        } else {
            AllowMethods::any()
        }
    } else {
        AllowMethods::list(cfg.allow_methods.iter().filter_map(|m| {
            Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|e| warn!(method = %m, error = %e, "ignoring invalid CORS method"))
                .ok()
        }))
    };

    let headers = if wildcard(&cfg.allow_headers) {
        if cfg.allow_credentials {
            AllowHeaders::mirror_request()
        } else {
            AllowHeaders::any()
        }
    } else {
        AllowHeaders::list(cfg.allow_headers.iter().filter_map(|h| {
            HeaderName::from_bytes(h.as_bytes())
                .map_err(|e| warn!(header = %h, error = %e, "ignoring invalid CORS header"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(headers)
        .allow_credentials(cfg.allow_credentials)
}

pub async fn serve(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
