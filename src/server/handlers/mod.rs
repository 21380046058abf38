// request handlers

pub mod assets;
pub mod upload;
