use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::BiolinkError;
use crate::message::{Inbound, Message, ValueChange, auth_message};
use crate::metrics::MetricSnapshot;
use crate::network::{Connector, FramedTransport};
use crate::session::{CloseReason, SessionConfig, SessionObserver, SessionReport};
use crate::state::SessionPhase;

// ── SessionController ────────────────────────────────────────────

/// Drives one session against the streaming server.
///
/// Connect failures are retried up to `max_attempts` with a fixed delay.
/// Once connected the controller sends the auth message and dispatches
/// frames until the server closes the stream or an error occurs; nothing
/// after the connect phase is retried.
///
/// The latest [`MetricSnapshot`] is published on a `tokio::sync::watch`
/// channel so other tasks can render it without touching the loop.
pub struct SessionController<C, O = ()> {
    config: SessionConfig,
    connector: C,
    observer: O,
    phase: SessionPhase,
    snapshot: MetricSnapshot,
    snapshot_tx: watch::Sender<MetricSnapshot>,
}

impl<C, O> SessionController<C, O>
where
    C: Connector,
    O: SessionObserver,
{
    pub fn new(config: SessionConfig, connector: C, observer: O) -> Self {
        let (snapshot_tx, _) = watch::channel(MetricSnapshot::new());
        Self {
            config,
            connector,
            observer,
            phase: SessionPhase::default(),
            snapshot: MetricSnapshot::new(),
            snapshot_tx,
        }
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn snapshot(&self) -> &MetricSnapshot {
        &self.snapshot
    }

    /// Receiver that sees every accepted metric update.
    pub fn snapshot_receiver(&self) -> watch::Receiver<MetricSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Run the whole session.
    ///
    /// Returns `Err(Connect)` when every attempt failed. Anything that
    /// goes wrong after connecting is reported in the `SessionReport`.
    /// A controller runs once; calling this again is a
    /// `ProtocolViolation`.
    pub async fn run(&mut self) -> Result<SessionReport, BiolinkError> {
        if self.phase != SessionPhase::Disconnected {
            return Err(BiolinkError::ProtocolViolation(
                "session controller has already run",
            ));
        }

        let stream = self.connect_with_retry().await?;
        let mut transport = FramedTransport::new(stream);

        self.phase.begin_auth()?;
        if let Err(e) = transport.send(&auth_message(&self.config.api_key)).await {
            error!("failed to send auth command: {e}");
            self.phase.close()?;
            return Ok(self.report(CloseReason::Error(e), 0));
        }
        debug!("auth command sent");

        self.phase.activate()?;
        let (close, messages) = self.receive_loop(&mut transport).await;
        let duration = self.phase.active_duration();
        self.phase.close()?;

        if close.is_graceful() {
            if let Err(e) = transport.close().await {
                debug!("shutdown after server close: {e}");
            }
        }
        info!(messages, ?duration, "session closed");

        Ok(self.report(close, messages))
    }

    fn report(&self, close: CloseReason, messages: u64) -> SessionReport {
        SessionReport {
            close,
            messages,
            snapshot: self.snapshot,
        }
    }

    async fn connect_with_retry(&mut self) -> Result<C::Stream, BiolinkError> {
        let max = self.config.max_attempts;
        loop {
            let attempt = self.phase.begin_connect()?;
            info!(addr = %self.config.addr, attempt, max, "connecting to server");

            let err = match self.connector.connect(&self.config.addr).await {
                Ok(stream) => {
                    info!("connected to server");
                    return Ok(stream);
                }
                Err(e) => e,
            };

            error!(attempt, max, "failed to connect to server: {err}");
            self.phase.connect_failed(max)?;

            if let SessionPhase::Failed { attempts } = self.phase {
                error!(attempts, "giving up on {}", self.config.addr);
                return Err(BiolinkError::Connect {
                    addr: self.config.addr.to_string(),
                    attempts,
                    source: err,
                });
            }

            info!("retrying in {:?}", self.config.retry_delay);
            tokio::time::sleep(self.config.retry_delay).await;
        }
    }

    async fn receive_loop<S>(&mut self, transport: &mut FramedTransport<S>) -> (CloseReason, u64)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut messages = 0u64;
        loop {
            match transport.receive().await {
                Ok(Some(message)) => {
                    messages += 1;
                    self.dispatch(&message);
                }
                Ok(None) => {
                    info!("connection closed by server");
                    return (CloseReason::EndOfStream, messages);
                }
                Err(e) => {
                    if e.is_transport() {
                        error!("connection lost: {e}");
                    } else {
                        error!("dropping session after undecodable payload: {e}");
                    }
                    return (CloseReason::Error(e), messages);
                }
            }
        }
    }

    fn dispatch(&mut self, message: &Message) {
        self.observer.on_message(message);

        match Inbound::from_message(message) {
            Inbound::ValueChange(change) => self.apply_value_change(&change),
            Inbound::MalformedValueChange => {
                warn!("ignoring valueChange without a string key and numeric value");
            }
            Inbound::AuthFailed => {
                error!("authentication failed, check API key");
                self.observer.on_auth_failed(message);
            }
            Inbound::SessionComplete => {
                info!("session complete");
                self.observer.on_session_complete(message);
            }
            Inbound::Unknown(command) => {
                debug!(?command, "ignoring unrecognised command");
            }
        }
    }

    fn apply_value_change(&mut self, change: &ValueChange) {
        match self.snapshot.update(&change.key, change.value) {
            Some(metric) => {
                self.snapshot_tx.send_replace(self.snapshot);
                self.observer
                    .on_value_change(metric, change.value, &self.snapshot);
            }
            None => debug!(key = %change.key, "ignoring untracked metric"),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
