pub mod cmd;

pub use cmd::*;
