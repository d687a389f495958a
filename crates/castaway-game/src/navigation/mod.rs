//! Navigation: walkable-surface representation and click-to-move

pub mod click_to_move;
pub mod navmesh;

pub use click_to_move::ClickToMove;
pub use navmesh::{NavMesh, NavMeshError, Ray};
