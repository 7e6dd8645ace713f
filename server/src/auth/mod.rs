use axum::Router;

use crate::state::AppState;

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
mod jwt;
mod password;
pub mod repo;

pub use claims::{AccessClaims, Claims, RefreshClaims};
pub use jwt::{TokenError, TokenService};

pub fn router() -> Router<AppState> {
    handlers::auth_routes().merge(handlers::me_routes())
}
