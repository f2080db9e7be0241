pub mod plan;
pub mod usage;
pub mod user;

pub use plan::*;
pub use usage::*;
pub use user::*;
