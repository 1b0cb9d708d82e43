pub mod config;
pub mod error;
pub mod types;

pub use config::{ActionPriorities, PlannerConfig};
pub use error::{PlanError, Result, SceneRole};
pub use types::{ActionType, NavigationPurpose, RotationDirection};
