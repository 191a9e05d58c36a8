pub use crate::error::{Error, OiResult};
pub use crate::types::{ApiResponse, OrgFilter, OrgId, Role, TeamRole, Timestamp, UserId, UserStatus};
pub use tracing::{debug, error, info, warn};

// vim: ts=4
