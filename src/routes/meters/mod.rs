mod handlers;
mod types;

pub(crate) use handlers::fetch_meters;
pub use handlers::{MetersQuery, get_meter, list_meters};
pub use types::MeterResponse;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_meter, __path_list_meters};
