#![forbid(unsafe_code)]

//! Core primitives for the Tessel tiling engine.
//!
//! # Role in Tessel
//! `tessel-core` holds the small, dependency-light pieces shared by the layout
//! engine and its hosts:
//!
//! - **Geometry**: [`Vec2`] and [`Rect`] in host pixel coordinates.
//! - **Coalescing**: [`coalesce::PointerCoalescer`] for trailing-edge
//!   debouncing of live drag/resize pointer streams.
//!
//! The layout engine itself lives in `tessel-layout`.

pub mod coalesce;
pub mod geometry;

pub use geometry::{EdgeDistances, Rect, Vec2};
