//! Route definition for points balances.

use axum::routing::get;
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/points", get(points::my_balance))
}
