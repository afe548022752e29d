pub mod border;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod naming;
pub mod nation;
pub mod province;
pub mod render;
pub mod rng;
pub mod tessellation;
pub mod world;

pub use border::Border;
pub use config::{BorderSettings, PopulationSettings, WorldGenerationParams};
pub use error::MapError;
pub use generator::{GenerationOutcome, InMemoryStore, MapGenerator, MapStore, generate_map};
pub use geometry::Point;
pub use nation::Nation;
pub use province::{Climate, Province, Terrain};
pub use world::{MapMetadata, MapStats, WorldMap};
