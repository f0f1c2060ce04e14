pub mod assets;
pub mod catalogue;
pub mod convert;
pub mod csv;
pub mod loader;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod log_capture;
