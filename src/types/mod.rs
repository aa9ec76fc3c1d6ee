mod frame;
mod row;
mod value;

pub use frame::DataFrame;
pub use row::{ColumnDesc, Row, STRING_TYPE_CODE};
pub use value::SqlValue;
