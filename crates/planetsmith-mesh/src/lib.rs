//! Planet mesh construction: base icospheres, terrain displacement, vertex
//! colors and normals, and the water and atmosphere shells.

mod base_mesh;
mod buffer;
mod builder;
mod error;
mod normals;
mod shells;

pub use base_mesh::BaseMesh;
pub use buffer::VertexBuffer;
pub use builder::{BuildSettings, GeneratedPlanet, PlanetStats, TerrainMeshBuilder};
pub use error::TopologyError;
pub use normals::compute_vertex_normals;
pub use shells::{AtmosphereShell, atmosphere_color, water_color, water_radius};
