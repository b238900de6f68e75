#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "A multi-user task tracking API. Users register, log in with the OAuth2 password"]
#![doc = "flow to obtain a bearer token, and create and list their own tasks. The `auth`"]
#![doc = "module holds the password hasher, token service and identity resolver; everything"]
#![doc = "else is routing, validation and persistence around it. The binary (`main.rs`)"]
#![doc = "wires these together into an actix-web server."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;

pub use crate::error::AppError;
pub use crate::state::AppState;
