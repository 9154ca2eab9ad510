//! Audit events recorded alongside money movement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use super::ids::{CustomerId, EventId};

/// Event kind discriminants as stored.
pub mod event_kind {
    /// A customer queued an external transfer for later processing.
    pub const TRANSFER_QUEUED: i16 = 1;
}

/// Request-scoped facts captured when an event-producing call arrives.
///
/// Exactly one of `request_ip4` / `request_ip6` is normally set, depending
/// on which stack the request came in over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInfo {
    pub request_ip4: Option<Ipv4Addr>,
    pub request_ip6: Option<Ipv6Addr>,
    pub request_time: DateTime<Utc>,
}

impl EventInfo {
    pub fn at(request_time: DateTime<Utc>) -> Self {
        EventInfo {
            request_ip4: None,
            request_ip6: None,
            request_time,
        }
    }

    pub fn with_ip4(mut self, ip: Ipv4Addr) -> Self {
        self.request_ip4 = Some(ip);
        self
    }

    pub fn with_ip6(mut self, ip: Ipv6Addr) -> Self {
        self.request_ip6 = Some(ip);
        self
    }
}

/// A persisted audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: EventId,
    pub customer_id: CustomerId,
    pub kind: i16,
    pub ip4: Option<Ipv4Addr>,
    pub ip6: Option<Ipv6Addr>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for an audit event.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    pub customer_id: CustomerId,
    pub kind: i16,
    pub ip4: Option<Ipv4Addr>,
    pub ip6: Option<Ipv6Addr>,
    pub created_at: DateTime<Utc>,
}

impl NewAuditEvent {
    /// Build the queued-transfer event from request facts.
    pub fn transfer_queued(customer_id: CustomerId, info: &EventInfo) -> Self {
        NewAuditEvent {
            customer_id,
            kind: event_kind::TRANSFER_QUEUED,
            ip4: info.request_ip4,
            ip6: info.request_ip6,
            created_at: info.request_time,
        }
    }
}
