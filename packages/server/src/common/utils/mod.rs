pub mod bitable;
pub mod email;
pub mod html;

pub use bitable::*;
pub use email::*;
pub use html::*;
