mod capability;
pub use capability::{Capability, StorageTypes};

mod type_mapping;
pub use type_mapping::{TypeMapping, TypeMappingSource};
