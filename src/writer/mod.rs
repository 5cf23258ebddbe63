//! Output document writer.
//!
//! Accepts ordered draw directives from the page renderer and assembles a
//! new PDF document with lopdf. Document-level serialization (stream
//! compression, cross-reference table, trailer) is lopdf's job; nothing
//! in the redraw core touches it.

mod canvas;

pub use canvas::PageCanvas;
