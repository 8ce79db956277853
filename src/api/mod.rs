/// API routes and handlers
pub mod dataspaces;
pub mod well_known;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(well_known::routes())
        .merge(dataspaces::routes())
}
