//! Concrete node definitions built on the code-function mechanism.
//!
//! These are data, not logic: each module builds a [`NodeDefinition`]
//! holding body templates in the target shading language.
//!
//! [`NodeDefinition`]: crate::variant::NodeDefinition

pub mod blend;
pub mod noise;
