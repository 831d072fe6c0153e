pub(crate) mod bootstrap;
mod error;
mod headless;
pub(crate) mod loop_runner;
mod room_files;
mod script;

pub(crate) use error::ViewerError;
