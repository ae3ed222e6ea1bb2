//! # Visitor Session
//!
//! What a visitor carries between requests: the discount captured when they
//! redeemed a code.
//!
//! The cached percentage is a snapshot. Each render re-checks the
//! convention against today's date, so an expired convention stops
//! discounting even though the session still holds the number.

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use stayrate_core::SessionDiscount;

/// One visitor's session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSession {
    discount: Option<SessionDiscount>,
}

impl VisitorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous redemption.
    pub fn set(&mut self, discount: SessionDiscount) {
        self.discount = Some(discount);
    }

    pub fn clear(&mut self) {
        self.discount = None;
    }

    pub fn current(&self) -> Option<&SessionDiscount> {
        self.discount.as_ref()
    }

    /// The redeemed discount, or `SESSION_REQUIRED`.
    pub fn require(&self) -> Result<&SessionDiscount, ServiceError> {
        self.discount.as_ref().ok_or_else(ServiceError::session_required)
    }

    pub fn is_redeemed(&self) -> bool {
        self.discount.is_some()
    }
}
