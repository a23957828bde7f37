// Library crate: exposes testable modules for integration tests and scripting.
// The egui host (app) stays in the binary crate.

pub mod command;
pub mod dimension;
pub mod fixtures;
pub mod harness;
pub mod state;

/// Camera, meshes and ray casting shared by the tool and the host.
pub mod viewport {
    pub mod camera;
    pub mod edge;
    pub mod mesh;
    pub mod picking;
}
