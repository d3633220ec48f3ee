pub mod classify;
pub mod extract;
pub mod geojson;
pub mod normalize;
pub mod schema;
