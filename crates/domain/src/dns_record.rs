mod record;
mod record_type;

pub use record::{RecordValue, ResourceRecord};
pub use record_type::RecordType;
