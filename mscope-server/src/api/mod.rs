//! HTTP API handlers for mscope-server

pub mod analysis;
pub mod extract;
pub mod health;
pub mod settings;
pub mod specimens;
pub mod ui;

pub use analysis::analysis_routes;
pub use extract::ApiJson;
pub use health::{health_routes, BuildInfo};
pub use settings::settings_routes;
pub use specimens::specimen_routes;
pub use ui::serve_index;
