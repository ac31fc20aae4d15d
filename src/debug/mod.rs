// src/debug/mod.rs
pub mod svg;

pub use svg::{render_territory_svg, write_territory_svg};
