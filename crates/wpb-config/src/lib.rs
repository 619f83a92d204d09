pub mod builder;
pub mod env;
pub mod error;
pub mod loaders;
pub mod lookup;
pub mod plan;
pub mod plugins;
pub mod settings;

// Re-export main types
pub use builder::WebpackBuilder;
pub use env::Environment;
pub use error::*;
pub use loaders::{Loaders, UseEntry};
pub use lookup::PathLookup;
pub use plan::BuildPlan;
pub use plugins::{extracts_styles, plugins, Plugin};
pub use settings::*;
