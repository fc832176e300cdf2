pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use routes::create_router;
