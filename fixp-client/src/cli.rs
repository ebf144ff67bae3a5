/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Command line arguments.

use clap::Parser;
use fixp_core::error::SessionError;
use fixp_core::types::{OrdType, Side, TimeInForce, Timestamp};
use fixp_engine::builder::DEFAULT_URL;
use fixp_message::application::OrderParams;
use fixp_message::fixp::{DEFAULT_KEEPALIVE_SCALE, TimestampUnit};
use fixp_session::config::{SessionConfig, SessionConfigBuilder};
use fixp_session::heartbeat::DEFAULT_HEARTBEAT_SECS;
use rust_decimal::Decimal;
use std::time::Duration;

/// Places one order over a FIXP WebSocket session, waits for its execution
/// report and disconnects.
#[derive(Debug, Clone, Parser)]
#[command(name = "fixp-client", version, about)]
pub struct Args {
    /// WebSocket endpoint.
    #[arg(long = "url", env = "FIXP_URL", default_value = DEFAULT_URL)]
    pub url: String,

    /// Login user name.
    #[arg(long = "user-name", env = "FIXP_USER_NAME")]
    pub user_name: String,

    /// Login password.
    #[arg(long = "password", env = "FIXP_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Trading account the order is booked on.
    #[arg(long = "account-id", env = "FIXP_ACCOUNT_ID", default_value = "1")]
    pub account_id: String,

    /// Heartbeat interval in seconds.
    #[arg(long = "heartbeat-interval", default_value_t = DEFAULT_HEARTBEAT_SECS)]
    pub heartbeat_interval: u64,

    /// Multiplier giving the advertised KeepaliveInterval.
    #[arg(long = "keepalive-scale", default_value_t = DEFAULT_KEEPALIVE_SCALE)]
    pub keepalive_scale: u64,

    /// Unit of the session-layer Timestamp: `nanos` or fractional `secs`.
    #[arg(long = "timestamp-unit", default_value = "nanos")]
    pub timestamp_unit: TimestampUnit,

    /// Connection timeout in seconds.
    #[arg(long = "connect-timeout", default_value_t = 10)]
    pub connect_timeout: u64,

    /// Marketplace-assigned security identifier.
    #[arg(long = "security-id", default_value = "CS.D.AEURGBP.CZD.IP")]
    pub security_id: String,

    /// Order currency.
    #[arg(long = "currency", default_value = "GBP")]
    pub currency: String,

    /// Order side.
    #[arg(long = "side", default_value = "Buy")]
    pub side: Side,

    /// Order quantity.
    #[arg(long = "order-qty", default_value = "1")]
    pub order_qty: Decimal,

    /// Order type.
    #[arg(long = "ord-type", default_value = "Market")]
    pub ord_type: OrdType,

    /// Time in force.
    #[arg(long = "time-in-force", default_value = "ImmediateOrCancel")]
    pub time_in_force: TimeInForce,

    /// Limit price, sent only together with --expire-time.
    #[arg(long = "price")]
    pub price: Option<Decimal>,

    /// Order expiry, RFC 3339 or `YYYYMMDD-HH:MM:SS.sss` UTC.
    #[arg(long = "expire-time")]
    pub expire_time: Option<Timestamp>,
}

impl Args {
    /// Builds the order template.
    #[must_use]
    pub fn order(&self) -> OrderParams {
        let mut order = OrderParams::new(
            self.account_id.clone(),
            self.security_id.clone(),
            self.side,
            self.order_qty,
            self.ord_type,
            self.currency.clone(),
            self.time_in_force,
        );
        if let Some(price) = self.price {
            order = order.with_price(price);
        }
        if let Some(expire_time) = self.expire_time {
            order = order.with_expire_time(expire_time);
        }
        order
    }

    /// Builds the session configuration.
    ///
    /// # Errors
    /// Returns `SessionError::Configuration` for empty credentials or a zero
    /// heartbeat interval or keepalive scale.
    pub fn session_config(&self) -> Result<SessionConfig, SessionError> {
        SessionConfigBuilder::new()
            .user_name(self.user_name.clone())
            .password(self.password.clone())
            .heartbeat_interval_secs(self.heartbeat_interval)
            .keepalive_scale(self.keepalive_scale)
            .timestamp_unit(self.timestamp_unit)
            .order(self.order())
            .build()
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["fixp-client", "--user-name", "trader", "--password", "secret"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.url, DEFAULT_URL);
        assert_eq!(args.account_id, "1");
        assert_eq!(args.heartbeat_interval, 3);
        assert_eq!(args.side, Side::Buy);
        assert_eq!(args.ord_type, OrdType::Market);
        assert_eq!(args.time_in_force, TimeInForce::ImmediateOrCancel);
        assert_eq!(args.order_qty, Decimal::ONE);
        assert!(args.price.is_none());
        assert!(args.expire_time.is_none());
        assert_eq!(args.timestamp_unit, TimestampUnit::Nanoseconds);
    }

    #[test]
    fn test_timestamp_unit_flag() {
        let args = parse(&["--timestamp-unit", "secs"]);
        let config = args.session_config().unwrap();
        assert_eq!(config.timestamp_unit, TimestampUnit::Seconds);

        let result = Args::try_parse_from([
            "fixp-client",
            "--user-name",
            "trader",
            "--password",
            "secret",
            "--timestamp-unit",
            "minutes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_keepalive_scale_rejected() {
        let args = parse(&["--keepalive-scale", "0"]);
        assert!(args.session_config().is_err());
    }

    #[test]
    fn test_expire_time_out_of_range_rejected() {
        let result = Args::try_parse_from([
            "fixp-client",
            "--user-name",
            "trader",
            "--password",
            "secret",
            "--expire-time",
            "22700101-00:00:00.000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_session_config_from_args() {
        let args = parse(&["--account-id", "PDKKL", "--heartbeat-interval", "5"]);
        let config = args.session_config().unwrap();
        assert_eq!(config.user_name, "trader");
        assert_eq!(config.account(), "PDKKL");
        assert_eq!(config.heartbeat_interval.as_secs(), 5);
        assert_eq!(config.keepalive_interval(), 50_000);
    }

    #[test]
    fn test_dated_limit_order() {
        let args = parse(&[
            "--ord-type",
            "Limit",
            "--side",
            "sell",
            "--price",
            "0.8512",
            "--expire-time",
            "20300101-12:00:00.000",
            "--time-in-force",
            "GoodTillDate",
        ]);
        let order = args.order();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.price, Some(Decimal::new(8_512, 4)));
        assert!(order.expire_time.is_some());
    }

    #[test]
    fn test_zero_heartbeat_rejected() {
        let args = parse(&["--heartbeat-interval", "0"]);
        assert!(args.session_config().is_err());
    }

    #[test]
    fn test_password_required() {
        let result = Args::try_parse_from(["fixp-client", "--user-name", "trader"]);
        if std::env::var_os("FIXP_PASSWORD").is_none() {
            assert!(result.is_err());
        }
    }
}
