/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Client-side reactor.
//!
//! The initiator connects, then drives one [`Session`] from a single task:
//! transport events, session timers and the interrupt signal are handled in
//! arrival order, and every outbound frame goes through the connection's
//! writer queue.

use crate::application::Application;
use crate::timer::TimerService;
use fixp_core::document::{Document, Layer};
use fixp_core::error::FixpError;
use fixp_core::types::SessionId;
use fixp_session::config::SessionConfig;
use fixp_session::io::{SessionIo, TimerKind};
use fixp_session::runner::TaskRunner;
use fixp_session::session::Session;
use fixp_session::state::SessionState;
use fixp_transport::codec::TransportEvent;
use fixp_transport::connection::{WsConnection, WsSender, connect};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How long to wait for the peer to confirm a locally initiated close.
pub const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// [`SessionIo`] backed by the connection writer and the timer service.
pub struct ReactorIo<'a> {
    sender: &'a WsSender,
    timers: &'a mut TimerService,
}

impl<'a> ReactorIo<'a> {
    /// Creates an I/O adapter over the given writer and timers.
    #[must_use]
    pub fn new(sender: &'a WsSender, timers: &'a mut TimerService) -> Self {
        Self { sender, timers }
    }
}

impl SessionIo for ReactorIo<'_> {
    fn send(&mut self, frame: String) {
        if let Err(e) = self.sender.send_text(frame) {
            warn!(error = %e, "Dropping outbound frame");
        }
    }

    fn schedule(&mut self, delay: Duration, timer: TimerKind) {
        self.timers.schedule(delay, timer);
    }

    fn close(&mut self) {
        self.timers.clear();
        self.sender.close();
    }
}

/// Outcome of one reactor step.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Continue,
    Closed(String),
}

/// A configured FIXP client.
#[derive(Debug)]
pub struct Initiator<A: Application> {
    url: String,
    connect_timeout: Duration,
    tick_period: Duration,
    config: SessionConfig,
    application: Arc<A>,
}

impl<A: Application> Initiator<A> {
    pub(crate) fn new(
        url: String,
        connect_timeout: Duration,
        tick_period: Duration,
        config: SessionConfig,
        application: Arc<A>,
    ) -> Self {
        Self {
            url,
            connect_timeout,
            tick_period,
            config,
            application,
        }
    }

    /// Returns the endpoint.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Connects and runs the session until the transport closes.
    ///
    /// Returns the id of the finished session. A counterparty rejection is
    /// reported to [`Application::on_close`] in place of the transport reason.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be established or the
    /// background task cannot be started. Protocol anomalies never surface
    /// here.
    pub async fn run(self) -> Result<SessionId, FixpError> {
        let mut connection = connect(&self.url, self.connect_timeout).await?;

        let mut session = Session::new(self.config);
        let session_id = session.id();
        info!(%session_id, url = %self.url, "Session created");
        session.attach_worker(Box::new(TaskRunner::counter(self.tick_period)?));
        self.application.on_create(session_id).await;

        let transport_reason =
            drive(&mut session, &mut connection, self.application.as_ref()).await;
        let reason = session
            .rejection()
            .map_or(transport_reason, ToString::to_string);

        self.application.on_close(session_id, &reason).await;
        info!(%session_id, reason = %reason, "Session finished");
        Ok(session_id)
    }
}

/// Runs the reactor loop until the transport closes.
///
/// Returns the close reason.
async fn drive<A: Application + ?Sized>(
    session: &mut Session,
    connection: &mut WsConnection,
    application: &A,
) -> String {
    let sender = connection.sender();
    let mut timers = TimerService::new();
    let mut established = false;
    let mut interrupted = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let step = tokio::select! {
            event = connection.next_event() => {
                let mut io = ReactorIo::new(&sender, &mut timers);
                on_event(session, event, &mut io, application).await
            }
            timer = timers.next_expired() => {
                let mut io = ReactorIo::new(&sender, &mut timers);
                session.on_timer(timer, &mut io);
                Step::Continue
            }
            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                if let Err(e) = result {
                    error!(error = %e, "Failed to listen for interrupt");
                } else {
                    info!(session_id = %session.id(), "Interrupt received, shutting down");
                    let mut io = ReactorIo::new(&sender, &mut timers);
                    session.shutdown(&mut io);
                }
                Step::Continue
            }
        };

        if !established && session.state() == SessionState::Established {
            established = true;
            application.on_established(session.id()).await;
        }

        match step {
            Step::Closed(reason) => return reason,
            Step::Continue if session.state() == SessionState::Closed => {
                return await_close(connection).await;
            }
            Step::Continue => {}
        }
    }
}

async fn on_event<A: Application + ?Sized>(
    session: &mut Session,
    event: Option<TransportEvent>,
    io: &mut ReactorIo<'_>,
    application: &A,
) -> Step {
    match event {
        Some(TransportEvent::Open) => {
            info!(session_id = %session.id(), "WebSocket connection open");
            session.on_open(io);
            Step::Continue
        }
        Some(TransportEvent::Text(text)) => {
            debug!(session_id = %session.id(), frame = %text, "Received");
            match Document::from_json(&text) {
                Ok(document) => {
                    let discriminator = session.on_document(&document, io);
                    if discriminator.is_some_and(|d| d.layer == Layer::Application) {
                        application.from_app(&document, session.id()).await;
                    }
                }
                Err(e) => {
                    warn!(session_id = %session.id(), error = %e, "Dropping malformed frame");
                }
            }
            Step::Continue
        }
        Some(TransportEvent::Binary(len)) => {
            info!(session_id = %session.id(), len, "Binary message received");
            Step::Continue
        }
        Some(TransportEvent::Closed(reason)) => {
            session.on_close(&reason);
            Step::Closed(reason)
        }
        None => {
            let reason = "transport stopped".to_string();
            session.on_close(&reason);
            Step::Closed(reason)
        }
    }
}

/// Waits for the transport to confirm a locally initiated close.
async fn await_close(connection: &mut WsConnection) -> String {
    let wait = async {
        while let Some(event) = connection.next_event().await {
            if let TransportEvent::Closed(reason) = event {
                return reason;
            }
        }
        "transport stopped".to_string()
    };
    match tokio::time::timeout(CLOSE_GRACE, wait).await {
        Ok(reason) => reason,
        Err(_) => {
            warn!("Peer did not confirm close in time");
            "close not confirmed".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::LoggingApplication;
    use crate::builder::EngineBuilder;
    use fixp_core::error::TransportError;
    use fixp_core::types::{OrdType, Side, TimeInForce};
    use fixp_message::application::OrderParams;
    use rust_decimal::Decimal;
    use tokio::net::TcpListener;

    fn config() -> SessionConfig {
        let order = OrderParams::new(
            "1",
            "CS.D.AEURGBP.CZD.IP",
            Side::Buy,
            Decimal::ONE,
            OrdType::Market,
            "GBP",
            TimeInForce::ImmediateOrCancel,
        );
        SessionConfig::new("trader", "secret", order)
    }

    #[tokio::test]
    async fn test_refused_connection_is_fatal() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let initiator = EngineBuilder::new()
            .with_application(LoggingApplication)
            .with_session(config())
            .with_url(format!("ws://{addr}"))
            .with_connect_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = initiator.run().await.unwrap_err();
        assert!(matches!(
            err,
            FixpError::Transport(TransportError::ConnectionFailed(_))
        ));
    }
}
