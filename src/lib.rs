pub mod action;
pub mod config;
pub mod error;
pub mod fingers;
pub mod fps;
pub mod gesture;
pub mod landmarks;
pub mod mapper;
pub mod scroll;
pub mod session;
pub mod source;
pub mod trace;
