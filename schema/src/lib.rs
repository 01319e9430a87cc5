//! Wire-level contract of the energy prediction service: the field catalog,
//! the validated building record and the request/response messages.

mod building;
mod error;
pub mod fields;
pub mod msg;
mod value;

pub use building::BuildingRecord;
pub use error::{FieldViolation, ValidationErr, Violation};
pub use fields::{FIELDS, FieldDef, FieldKind, Role, TARGET};
pub use value::Value;
