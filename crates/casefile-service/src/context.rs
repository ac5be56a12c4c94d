//! Request context carrying the calling advisor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current request.
///
/// Identity is verified upstream; the filestore only records who acted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Identifier of the acting advisor.
    pub advisor_id: String,
    /// Correlation id for log lines of this request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(advisor_id: impl Into<String>) -> Self {
        Self {
            advisor_id: advisor_id.into(),
            request_id: Uuid::new_v4(),
            request_time: Utc::now(),
        }
    }
}
