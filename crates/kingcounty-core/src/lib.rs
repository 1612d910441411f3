pub mod cleaning;
pub mod error;
pub mod features;
pub mod geo;
pub mod pipeline;
pub mod schema;

pub use error::{PreprocessError, Result};
pub use pipeline::{Preprocessor, Stage, TableStep};
