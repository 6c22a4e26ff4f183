//! Character generation core: universe registry, prompt templating,
//! parameter validation, output persistence, and the generation facade.

pub mod generator;
pub mod params;
pub mod persist;
pub mod prompt;
pub mod registry;

pub use generator::{CharacterGenerator, GenerateOptions, GeneratedCharacter};
pub use registry::Universe;
