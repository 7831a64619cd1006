//! Command implementations.

mod levels;
mod render;
mod resolve;

pub use levels::cmd_levels;
pub use render::{RenderStats, cmd_render, render_lines};
pub use resolve::cmd_resolve;
