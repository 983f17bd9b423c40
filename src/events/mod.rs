pub mod keyboard;
pub mod pointer;
pub mod scroll;

pub use keyboard::wire_keyboard;
pub use pointer::wire_pointer;
pub use scroll::{wire_scroll, wire_visibility};
