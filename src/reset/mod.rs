pub mod routines;
pub mod timer;
pub mod session;

pub use routines::*;
pub use timer::*;
pub use session::ResetSession;
