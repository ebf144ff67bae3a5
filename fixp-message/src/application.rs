/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Application-layer messages.
//!
//! Application documents start from their `MsgType` and are decorated with
//! the application version and an ISO-8601 `SendingTime`.

use crate::encoder::WireMessage;
use fixp_core::document::MessageKind;
use fixp_core::types::{OrdType, Side, TimeInForce, Timestamp};
use rust_decimal::Decimal;
use serde::Serialize;

/// Application version identifier stamped on every application message.
pub const APPL_VER_ID: &str = "FIX50SP2";

/// Source of the security identifiers used in orders.
pub const SECURITY_ID_SOURCE: &str = "MarketplaceAssignedIdentifier";

/// Type, version and sending time shared by application messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationHeader {
    /// Message type discriminator.
    #[serde(rename = "MsgType")]
    pub msg_type: MessageKind,
    /// Application version.
    #[serde(rename = "ApplVerID")]
    pub appl_ver_id: &'static str,
    /// Time the message was built, ISO-8601 with milliseconds.
    #[serde(rename = "SendingTime")]
    pub sending_time: String,
}

impl ApplicationHeader {
    /// Decorates a message type with the version and the current time.
    #[must_use]
    pub fn decorate(msg_type: MessageKind) -> Self {
        Self {
            msg_type,
            appl_ver_id: APPL_VER_ID,
            sending_time: Timestamp::now().format_iso().to_string(),
        }
    }
}

/// Trade parameters of an order submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    /// Trading account.
    pub account: String,
    /// Marketplace-assigned security identifier.
    pub security_id: String,
    /// Order side.
    pub side: Side,
    /// Order quantity.
    pub order_qty: Decimal,
    /// Order type.
    pub ord_type: OrdType,
    /// Order currency.
    pub currency: String,
    /// Time in force.
    pub time_in_force: TimeInForce,
    /// Limit price. Only sent together with an expire time.
    pub price: Option<Decimal>,
    /// Expiry of a dated order.
    pub expire_time: Option<Timestamp>,
}

impl OrderParams {
    /// Creates order parameters without price or expiry.
    #[must_use]
    pub fn new(
        account: impl Into<String>,
        security_id: impl Into<String>,
        side: Side,
        order_qty: Decimal,
        ord_type: OrdType,
        currency: impl Into<String>,
        time_in_force: TimeInForce,
    ) -> Self {
        Self {
            account: account.into(),
            security_id: security_id.into(),
            side,
            order_qty,
            ord_type,
            currency: currency.into(),
            time_in_force,
            price: None,
            expire_time: None,
        }
    }

    /// Sets the limit price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the expire time.
    #[must_use]
    pub fn with_expire_time(mut self, expire_time: Timestamp) -> Self {
        self.expire_time = Some(expire_time);
        self
    }
}

/// NewOrderSingle message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderSingle {
    /// Type, version and sending time.
    #[serde(flatten)]
    pub header: ApplicationHeader,
    /// Client order id.
    #[serde(rename = "ClOrdID")]
    pub cl_ord_id: String,
    /// Trading account.
    #[serde(rename = "Account")]
    pub account: String,
    /// Security identifier.
    #[serde(rename = "SecurityID")]
    pub security_id: String,
    /// Source of the security identifier.
    #[serde(rename = "SecurityIDSource")]
    pub security_id_source: &'static str,
    /// Order side.
    #[serde(rename = "Side")]
    pub side: Side,
    /// Order quantity.
    #[serde(rename = "OrderQty")]
    pub order_qty: Decimal,
    /// Order type.
    #[serde(rename = "OrdType")]
    pub ord_type: OrdType,
    /// Limit price.
    #[serde(rename = "Price", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Order currency.
    #[serde(rename = "Currency")]
    pub currency: String,
    /// Time in force.
    #[serde(rename = "TimeInForce")]
    pub time_in_force: TimeInForce,
    /// Expiry in FIX UTC format.
    #[serde(rename = "ExpireTime", skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<String>,
    /// Copy of `SendingTime`.
    #[serde(rename = "TransactTime")]
    pub transact_time: String,
}

impl WireMessage for NewOrderSingle {
    fn kind(&self) -> MessageKind {
        MessageKind::NewOrderSingle
    }
}

/// Builds a `NewOrderSingle` message.
///
/// `Price` and `ExpireTime` are only set when the parameters carry an expire
/// time. A price without an expiry is dropped.
///
/// # Arguments
/// * `params` - Trade parameters
/// * `cl_ord_id` - Client order id for this submission
#[must_use]
pub fn new_order_single(params: &OrderParams, cl_ord_id: impl Into<String>) -> NewOrderSingle {
    let header = ApplicationHeader::decorate(MessageKind::NewOrderSingle);
    let (price, expire_time) = match params.expire_time {
        Some(expire_time) => (params.price, Some(expire_time.format_millis().to_string())),
        None => (None, None),
    };
    let transact_time = header.sending_time.clone();

    NewOrderSingle {
        header,
        cl_ord_id: cl_ord_id.into(),
        account: params.account.clone(),
        security_id: params.security_id.clone(),
        security_id_source: SECURITY_ID_SOURCE,
        side: params.side,
        order_qty: params.order_qty,
        ord_type: params.ord_type,
        price,
        currency: params.currency.clone(),
        time_in_force: params.time_in_force,
        expire_time,
        transact_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market_order() -> OrderParams {
        OrderParams::new(
            "PDKKL",
            "CS.D.AEURGBP.CZD.IP",
            Side::Buy,
            Decimal::ONE,
            OrdType::Market,
            "GBP",
            TimeInForce::ImmediateOrCancel,
        )
    }

    #[test]
    fn test_new_order_single_fields() {
        let doc = new_order_single(&market_order(), "1-1595610929.414000")
            .to_document()
            .unwrap();

        let names: Vec<_> = doc.field_names().collect();
        assert_eq!(
            names,
            vec![
                "MsgType",
                "ApplVerID",
                "SendingTime",
                "ClOrdID",
                "Account",
                "SecurityID",
                "SecurityIDSource",
                "Side",
                "OrderQty",
                "OrdType",
                "Currency",
                "TimeInForce",
                "TransactTime",
            ]
        );
        assert_eq!(doc.get_str("MsgType"), Some("NewOrderSingle"));
        assert_eq!(doc.get_str("ApplVerID"), Some(APPL_VER_ID));
        assert_eq!(doc.get_str("ClOrdID"), Some("1-1595610929.414000"));
        assert_eq!(doc.get_str("SecurityIDSource"), Some(SECURITY_ID_SOURCE));
        assert_eq!(doc.get_str("Side"), Some("Buy"));
        assert_eq!(doc.get_str("OrderQty"), Some("1"));
        assert_eq!(doc.get_str("OrdType"), Some("Market"));
        assert_eq!(doc.get_str("TimeInForce"), Some("ImmediateOrCancel"));
        assert_eq!(doc.get_str("TransactTime"), doc.get_str("SendingTime"));
    }

    #[test]
    fn test_price_dropped_without_expire_time() {
        let params = market_order().with_price(Decimal::new(34_444, 3));
        let doc = new_order_single(&params, "1-0").to_document().unwrap();
        assert!(!doc.contains("Price"));
        assert!(!doc.contains("ExpireTime"));
    }

    #[test]
    fn test_price_and_expire_time_sent_together() {
        let expire: Timestamp = "20190802-17:00:00.000".parse().unwrap();
        let params = market_order()
            .with_price(Decimal::new(34_444, 3))
            .with_expire_time(expire);
        let doc = new_order_single(&params, "1-0").to_document().unwrap();
        assert_eq!(doc.get_str("Price"), Some("34.444"));
        assert_eq!(doc.get_str("ExpireTime"), Some("20190802-17:00:00.000"));
    }

    #[test]
    fn test_expire_time_without_price() {
        let expire: Timestamp = "20190802-17:00:00.000".parse().unwrap();
        let params = market_order().with_expire_time(expire);
        let doc = new_order_single(&params, "1-0").to_document().unwrap();
        assert!(!doc.contains("Price"));
        assert!(doc.contains("ExpireTime"));
    }

    #[test]
    fn test_builder_does_not_mutate_params() {
        let params = market_order().with_price(Decimal::TEN);
        let before = params.clone();
        let _ = new_order_single(&params, "1-0");
        assert_eq!(params, before);
    }

    #[test]
    fn test_sending_time_is_iso() {
        let msg = new_order_single(&market_order(), "1-0");
        let sending_time = msg.header.sending_time;
        assert_eq!(sending_time.len(), 23);
        assert_eq!(&sending_time[10..11], "T");
    }
}
