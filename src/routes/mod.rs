use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::{middleware, Router};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, events, health_check, notifications, teams};
use crate::middleware::require_session;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let cors = create_cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .merge(public_routes())
        .merge(admin_routes(state.clone()))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(cors)
        .with_state(state)
}

/// Routes reachable without a session. Keep this list short: everything
/// else is mounted behind [`require_session`].
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/public/events/:slug", get(events::get_public_event))
        .route(
            "/api/public/events/:slug/registrations",
            post(events::register_for_event),
        )
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/api/events/backfill-slugs", post(events::backfill_slugs))
        .route(
            "/api/events/:id",
            get(events::get_event).put(events::update_event),
        )
        .route(
            "/api/events/:id/registrations",
            get(events::list_registrations),
        )
        .route("/api/notifications", get(notifications::list_relevant))
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_read),
        )
        .route("/api/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/api/teams/:id/members",
            get(teams::list_members).post(teams::add_member),
        )
        .route(
            "/api/teams/:id/members/:member_id",
            delete(teams::remove_member),
        )
        .route_layer(middleware::from_fn_with_state(state, require_session))
}
