pub mod defaults;
pub mod descriptor;
pub mod index;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod types;

// Re-exports
pub use descriptor::{
    Cardinality, DefaultValue, EnumRef, EnumValue, FieldDescriptor, FileRef, ResolvedFile, Scope,
    TypeRef, ValueKind,
};
pub use index::{TypeIndex, TypeKind};
pub use loader::{load_descriptor_file, load_descriptor_set, LoadError, LoadedSet};
pub use resolver::{resolve_set, Resolver};
pub use types::error::{ErrorEntry, ValidationReport};
pub use types::field::FieldType;
