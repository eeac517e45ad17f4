pub mod serve;

pub use serve::{Backend, ServeCommand};
