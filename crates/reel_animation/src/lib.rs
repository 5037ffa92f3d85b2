//! Reel Animation Primitives
//!
//! Easing curves and spring physics shared by the viewport controller.
//!
//! # Features
//!
//! - **Easing**: Smoothstep and cubic curves for softening linear progress
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Deterministic**: Everything advances from caller-supplied `dt`

pub mod easing;
pub mod spring;

pub use easing::{smoothstep, Easing};
pub use spring::{Spring, SpringConfig};
