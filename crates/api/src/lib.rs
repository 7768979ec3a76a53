mod env;
mod global_state;
mod identity;
mod middleware;
mod response;
mod utils;
mod routes;

pub use routes::{
    api_routes,
    post_routes,
    like_routes,
    profile_routes,
    icon_routes,
};

pub use env::{ApiServerEnv, IdentityEnv};
pub use global_state::GlobalState;
pub use identity::{IdTokenClaims, IdentityVerifier, ID_TOKEN_USE};
pub use utils::{extract_id_token, setup_tracing};
pub use middleware::{authenticate, request_span};
pub use response::{AppError, AppSuccess};
