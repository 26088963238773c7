//! actsync Event Model
//!
//! Defines the core data contracts shared by every pipeline stage:
//! - **Events:** Timestamped keyboard/mouse events parsed from the raw log
//! - **Log:** Line-level parsing and serialization of event logs
//! - **Regions:** Screen rectangles used to attribute events to videos
//! - **Actions:** Composite, human-readable actions built from event runs
//!
//! Coordinates are absolute virtual-desktop pixels, exactly as logged.

pub mod action;
pub mod event;
pub mod log;
pub mod region;

pub use action::*;
pub use event::*;
pub use log::*;
pub use region::*;
