pub mod messages;
mod uttt;

pub use uttt::*;
