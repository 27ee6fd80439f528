// HTTP routes
pub mod health;
pub mod lark;

pub use health::*;
pub use lark::*;
