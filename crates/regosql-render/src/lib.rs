//! Rendering utilities for compile reports (terminal text, Markdown).

#![forbid(unsafe_code)]

mod markdown;
mod text;

pub use markdown::render_markdown;
pub use text::render_text;
