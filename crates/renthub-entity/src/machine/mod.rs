//! Machine entities: rentable templates, their specs, and physical instances.

pub mod instance;
pub mod model;
pub mod specs;

pub use instance::{CreateInstance, MachineInstance};
pub use model::{CreateMachine, MachineTemplate, MachineWithStats, UpdateMachine};
pub use specs::MachineSpecs;
