//! Unit definitions handed to the service manager
//!
//! Only transient services are built here; nothing is read from or written to disk.

mod job;
mod transient;

pub use job::{JobMode, ServiceResult};
pub use transient::{
    generate_unit_name, sleep_command, tokenize, ExecCommand, TokenizeError, UnitSpec,
    DEFAULT_DESCRIPTION, UNIT_NAME_PREFIX,
};
