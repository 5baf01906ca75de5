//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `tabs`: Content rendering (roster table, artist history chart)

pub mod input;
pub mod render;
pub mod styles;
pub mod tabs;
