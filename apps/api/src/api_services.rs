mod redis;
mod state_builder;

pub use state_builder::{ApiServices, build_app_state};

#[cfg(test)]
pub use state_builder::build_app_state_with;
