use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_authorization;
use crate::handlers::{create_url_handler, delete_url_handler, health_handler, redirect_handler};
use crate::state::AppState;

pub struct App {}

impl App {
    /// Builds the full router.
    ///
    /// Creating and deleting aliases sits behind [`require_authorization`];
    /// resolving an alias is public.
    pub fn router(state: AppState, request_timeout: Duration) -> Router {
        let admin = Router::new()
            .route("/url", post(create_url_handler))
            .route("/url/{alias}", delete(delete_url_handler))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_authorization,
            ));

        Router::new()
            .route("/health", get(health_handler))
            .route("/{alias}", get(redirect_handler))
            .merge(admin)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::with_status_code(
                        StatusCode::REQUEST_TIMEOUT,
                        request_timeout,
                    ))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
            .with_state(state)
    }
}
