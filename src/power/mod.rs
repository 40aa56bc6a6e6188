pub mod component;

pub use component::{PowerComponent, UnknownComponent};
