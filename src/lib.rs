// mediakit: engagement analytics and media kits for creators
//
// This is the library root. The CLI binary and the optional web API both
// sit on top of these modules.

pub mod config;
pub mod db;
pub mod engagement;
pub mod output;
pub mod render;
pub mod status;

#[cfg(feature = "web")]
pub mod web;
