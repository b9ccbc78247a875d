pub mod day;
pub mod store;
pub mod state;
pub mod manager;

pub use day::LocalDay;
pub use store::*;
pub use state::*;
pub use manager::*;
