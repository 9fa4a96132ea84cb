// src/map/mod.rs
pub mod door;
pub mod sector;
pub mod vertex;
pub mod wall;

pub use sector::SectorProps;
pub use vertex::Vertex;
pub use wall::{Wall, WallProps, SOLID};

/// Top-level keys holding the map's structural collections.
pub const VERTICES: &str = "vertices";
pub const SECTORS: &str = "sectors";
pub const WALLS: &str = "walls";
pub const DOORS: &str = "doors";
pub const LIGHTS: &str = "lights";
pub const PARTICLES: &str = "particles";
pub const ENTITIES: &str = "entities";
pub const PLAYER_START: &str = "player_start";

pub const STRUCTURAL_KEYS: &[&str] = &[
    VERTICES,
    SECTORS,
    WALLS,
    DOORS,
    LIGHTS,
    PARTICLES,
    ENTITIES,
    PLAYER_START,
];
