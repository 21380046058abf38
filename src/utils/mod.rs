// shared helpers

pub mod net;
pub mod paths;
