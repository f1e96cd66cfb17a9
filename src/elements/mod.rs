//! Structural elements module

mod element;
mod member;
mod node;
mod support;

pub use element::Element;
pub use member::{MasonryProps, Member, MemberMaterial, MemberType, SteelProps, TimberProps};
pub use node::{coordinate_key, Node};
pub use support::{Dof, Support};
