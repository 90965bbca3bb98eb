pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod health;
    pub mod upload;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
