pub mod bracket;
pub mod cache;
pub mod demo;
pub mod error;
pub mod estimate;
pub mod http_cache;
pub mod http_client;
pub mod league;
pub mod logging;
pub mod persist;
pub mod postseason;
pub mod projection;
pub mod provider;
pub mod ranking;
pub mod snapshot;
pub mod state;

pub use error::ProjectError;
pub use estimate::{Estimate, Outcome, TOTAL_GAMES};
pub use projection::{Projection, ProjectionConfig, Row, project, project_with};
