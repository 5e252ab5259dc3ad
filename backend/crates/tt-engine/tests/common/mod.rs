#![allow(dead_code)]

mod fixtures;
mod test_engine;

pub use fixtures::*;
pub use test_engine::*;
