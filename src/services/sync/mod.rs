pub mod client;
pub mod queue;

pub use client::*;
pub use queue::*;
