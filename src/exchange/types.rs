//! Exchange request/response DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExchangeError;
use crate::model::{AccountNumber, ExchangeId, ExchangeKind, ExchangeStatus, RoutingNumber};

/// A transfer intent presented to the router: both sides addressed by
/// account number + routing number, amount always positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub from_account_no: AccountNumber,
    pub to_account_no: AccountNumber,
    pub from_routing_no: RoutingNumber,
    pub to_routing_no: RoutingNumber,
    pub amount: Decimal,
}

/// Successful exchange outcome: the id of the ledger entry that was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeReceipt {
    pub transfer_id: ExchangeId,
}

/// Payload of a successful [`ExchangeResponse`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExchangeData {
    pub transfer_id: ExchangeId,
}

/// Wire shape returned to transfer callers.
///
/// `{success: false, msg}` on failure, `{success: true, data: {transfer_id}}`
/// on success. This contract is stable; API layers depend on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExchangeData>,
}

impl ExchangeResponse {
    pub fn ok(receipt: ExchangeReceipt) -> Self {
        ExchangeResponse {
            success: true,
            msg: None,
            data: Some(ExchangeData {
                transfer_id: receipt.transfer_id,
            }),
        }
    }

    pub fn fail(msg: impl Into<String>) -> Self {
        ExchangeResponse {
            success: false,
            msg: Some(msg.into()),
            data: None,
        }
    }
}

impl From<Result<ExchangeReceipt, ExchangeError>> for ExchangeResponse {
    fn from(result: Result<ExchangeReceipt, ExchangeError>) -> Self {
        match result {
            Ok(receipt) => ExchangeResponse::ok(receipt),
            Err(err) => ExchangeResponse::fail(err.to_string()),
        }
    }
}

/// One ledger row as seen from a queried account's point of view.
///
/// `amount` is sign-normalized: negative when the queried account is the
/// local from-side of the record, positive otherwise. Serializes the amount
/// as a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: ExchangeId,
    pub from_account_no: AccountNumber,
    pub to_account_no: AccountNumber,
    pub from_routing_no: RoutingNumber,
    pub to_routing_no: RoutingNumber,
    pub amount: Decimal,
    pub posted: DateTime<Utc>,
    pub finished: Option<DateTime<Utc>>,
    pub status: ExchangeStatus,
    pub kind: ExchangeKind,
}
