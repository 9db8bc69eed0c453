//! Tree scanning: physical traversal, collision resolution, unique names.

pub mod resolver;
pub mod unique;
pub mod walker;

pub use resolver::{resolve, Verdict};
pub use unique::unique_name;
pub use walker::{ScanOptions, ScanOutcome, ScanStats, Scanner};
