pub mod droid;
pub mod exporter;
pub mod portal;

pub use droid::*;
pub use exporter::*;
pub use portal::*;
