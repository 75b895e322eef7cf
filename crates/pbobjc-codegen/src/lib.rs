pub mod config;
pub mod context;
pub mod error;
pub mod extension;
pub mod field_data;
pub mod generator;
pub mod header_map;
pub mod naming;
pub mod traits;

// Re-exports
pub use config::{GeneratorOptions, OutputStyle};
pub use context::{ImportSet, Printer};
pub use error::CodegenError;
pub use extension::ExtensionGenerator;
pub use generator::{CodeGenerator, FileGenerator, GeneratedFiles};
pub use header_map::HeaderMap;
pub use traits::OutputSink;
