// src/core/types/mod.rs

pub mod point;

pub use point::{Point, EPSILON};
