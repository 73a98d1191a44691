//! Logical entity model
//!
//! The input of the [`Builder`](super::Builder). Nothing here knows about
//! tables or columns beyond the configuration that says where things should
//! be stored.

mod check;
pub use check::CheckConstraint;

mod entity_type;
pub use entity_type::{
    EntityType, EntityTypeId, MappingFragment, MappingStrategy, StoreName, TableConfig,
};

mod fk;
pub use fk::{DeleteBehavior, ForeignKey, ForeignKeyId};

mod function;
pub use function::{DbFunction, FunctionId, FunctionParameter};

mod index;
pub use index::{Index, IndexId};

mod key;
pub use key::{Key, KeyId};

mod procedure;
pub use procedure::{ParameterDirection, ProcedureParameter, StoreOperation, StoredProcedureConfig};

mod property;
pub use property::{ColumnOverride, Facets, Property, PropertyId, ValueGenerated};

mod schema;
pub use schema::Schema;

mod ty;
pub use ty::Type;

use super::Name;
