pub mod config;
pub mod logging;

pub mod bridge;
pub mod images;
pub mod remote;
pub mod sanitize;
pub mod storage;
pub mod tree;

#[cfg(test)]
pub(crate) mod testing;

pub use bridge::FigmaBridge;
