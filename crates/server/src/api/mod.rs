pub mod error;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routes;
pub mod tickets;
pub mod users;

pub use error::ApiError;
pub use routes::create_router;
