pub mod drag;
pub mod format;
pub mod media;
pub mod registry;
pub mod store;

pub use drag::{BarGeometry, DragController, DragState};
pub use media::{MediaElement, SimulatedMedia};
pub use registry::PlayerRegistry;
pub use store::{ControlState, LoopMode, PlayOrder, PlayerStore};
