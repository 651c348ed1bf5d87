//! The renderer (C2). A `Builder` is the single point where literal values
//! become positional placeholders; nothing outside this module touches the
//! argument vector.

mod core;

pub use core::{Builder, Renderable};
