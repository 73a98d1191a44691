//! Physical schema graph

mod check;
pub use check::{CheckConstraint, CheckConstraintId};

mod column;
pub use column::{Column, ColumnId, ColumnKind};

mod fk;
pub use fk::{ForeignKeyConstraint, ForeignKeyConstraintId, ReferentialAction};

mod function;
pub use function::{StoreFunction, StoreFunctionId, StoreFunctionParameter};

mod index;
pub use index::{TableIndex, TableIndexId};

mod procedure;
pub use procedure::{StoreStoredProcedure, StoredProcedureId};

mod query;
pub use query::{SqlQuery, SqlQueryId};

mod schema;
pub use schema::Schema;

mod store_object;
pub use store_object::{
    HasColumns, StoreObjectId, StoreObjectIdentifier, StoreObjectKind, TableBase,
};

mod table;
pub use table::{HasConstraints, Table, TableId};

mod ty;
pub use ty::Type;

mod unique;
pub use unique::{UniqueConstraint, UniqueConstraintId};

mod view;
pub use view::{View, ViewId};
