pub mod categories;
pub mod error;
pub mod form;
pub mod handlers;
pub mod routes;
pub mod torrents;

pub use error::{ApiError, ErrorResponse, SuccessResponse};
pub use form::FormFields;
pub use routes::create_router;
