pub mod audio;
pub mod config;
pub mod discovery;
pub mod event;
pub mod http;
pub mod model;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
