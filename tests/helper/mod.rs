#![allow(dead_code)]

mod repository;
mod tree;

pub use repository::FakeSourceRepository;
pub use tree::{ProjectTree, version, version_set};
