use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod home;
pub mod listings;
pub mod messages;
pub mod tenders;
pub mod users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(home::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(tenders::routes())
        .merge(listings::routes())
        .merge(messages::routes())
        .with_state(state)
}
