pub mod config;
pub mod synthetic;

pub use config::{
    ConfigLoader,
    DashboardConfig,
};
pub use synthetic::SyntheticSource;
