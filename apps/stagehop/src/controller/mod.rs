//! Controller layer: UI events, gesture handling, the sheet and selection
//! state machines, and the screen that wires them to the backend and map.

pub mod events;
pub mod gesture;
pub mod orchestration;
pub mod screen;
pub mod selection;
pub mod sheet;
