//! Catalog data types: type tags, type descriptors, columns and rows.

mod column;
mod descriptor;
mod metadata;
mod row;
mod type_tag;
mod value;

pub use column::{find_by_name, ordinal_at, ColumnMeta};
pub use descriptor::TypeDescriptor;
pub use metadata::{SchemaColumn, SizeHint, TableMeta};
pub use row::CatalogRow;
pub use type_tag::TypeTag;
pub use value::CellValue;
