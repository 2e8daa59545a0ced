pub mod config;
pub mod control;
pub mod event;
pub mod playback;
pub mod sensor;
pub mod ui;
pub mod util;
