mod handlers;
mod types;

pub(crate) use handlers::fetch_buildings;
pub use handlers::{get_building, list_buildings};
pub use types::BuildingResponse;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_get_building, __path_list_buildings};
