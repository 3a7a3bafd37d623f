use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, security_headers, Config};
use crate::handlers::event_form::{
    add_image, add_video, cancel_form, remove_image, remove_video, seed_form, set_image_input,
    set_video_input, show_form, submit_form, update_field,
};
use crate::handlers::health_check;
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/api/event-form", get(show_form))
        .route("/api/event-form/fields/:field", put(update_field))
        .route("/api/event-form/seed", post(seed_form))
        .route("/api/event-form/images", post(add_image).delete(remove_image))
        .route("/api/event-form/images/input", put(set_image_input))
        .route("/api/event-form/videos", post(add_video).delete(remove_video))
        .route("/api/event-form/videos/input", put(set_video_input))
        .route("/api/event-form/submit", post(submit_form))
        .route("/api/event-form/cancel", post(cancel_form))
        .with_state(state);

    for (name, value) in security_headers(config.production) {
        router = router.layer(SetResponseHeaderLayer::if_not_present(name, value));
    }

    router
        .layer(create_cors_layer(config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
}
