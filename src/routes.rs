use axum::{Router, routing::{get, post}};

use crate::api;
use crate::state::AppState;

/// Routing table for the whole service.
///
/// `GET /courses/{key}` serves both the id lookup and the name filter; the
/// handler tells them apart by whether `key` is an integer. `GET /courses/add`
/// is a name lookup like any other non-integer key.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/courses", get(api::list_courses))
        .route(
            "/courses/add",
            post(api::add_course).get(api::get_courses_named_add),
        )
        .route(
            "/courses/{key}",
            get(api::get_course)
                .patch(api::update_course)
                .delete(api::delete_course),
        )
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::not_found)
        .with_state(state)
}
