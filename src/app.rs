use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::TodoStore;
use crate::handlers::{protected, public};
use crate::middleware::{cors_layer, jwt_auth_middleware, preflight_no_content};

/// Shared handles injected into every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TodoStore>,
    pub auth: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>, auth: TokenVerifier) -> Self {
        Self {
            store,
            auth: Arc::new(auth),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let router: Router = Router::new()
        // Public
        .route("/health", get(public::health))
        .route("/health/ready", get(public::ready))
        // Protected
        .merge(todo_routes(state.clone()))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    // Global middleware; preflight handling must wrap the CORS layer
    router.layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(preflight_no_content))
            .layer(cors_layer(&config.security)),
    )
}

fn todo_routes(state: AppState) -> Router<AppState> {
    use protected::todos;

    Router::new()
        .route("/api/todos", get(todos::todo_list).post(todos::todo_create))
        .route("/api/todos/stats", get(todos::todo_stats))
        .route(
            "/api/todos/:id",
            get(todos::todo_get)
                .put(todos::todo_put)
                .delete(todos::todo_delete),
        )
        // route_layer so unknown paths stay 404 instead of 401
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}
