mod health;
mod metrics;
mod pass;

pub use health::*;
pub use metrics::*;
pub use pass::*;
