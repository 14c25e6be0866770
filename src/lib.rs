//! OmniScope client core: the data shaping behind the meeting-intelligence
//! views (weekly grouping, people directory, rollups, widget layout, page
//! view state) plus the typed data client and local storage they sit on.

pub mod aggregate;
pub mod calendar_import;
pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod decode;
pub mod error;
pub mod layout;
mod migrations;
pub mod storage;
pub mod types;
pub mod views;

pub use error::{AppError, Notice};
