#![forbid(unsafe_code)]

pub mod auth;
pub mod cli;
pub mod course;
pub mod formats;
pub mod logging;
pub mod manifest;
pub mod media;
pub mod profile;
pub mod slug;
