pub mod attributes;
pub mod controller;
pub mod gatekeeper;

pub use attributes::{SessionAttributes, WaitingSlot};
pub use controller::{SessionController, SessionState};
pub use gatekeeper::{next_requirement, SetupRequirement};
