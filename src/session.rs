use log::{debug, info, warn};
use tokio::time::timeout;

use crate::config::RunOptions;
use crate::corpus::RequestDescriptor;
use crate::endpoint::Endpoint;
use crate::error::{HarnessError, Operation, Result};
use crate::transport::{Connection, Transport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Open,
    Faulted,
}

/// A single connection to the target, with every send and every receive bounded on
/// its own by the configured timeout.
pub struct Session<C: Connection> {
    conn: Option<C>,
    state: SessionState,
    options: RunOptions,
}

impl<C: Connection> Session<C> {
    pub async fn open<T>(transport: &T, endpoint: &Endpoint, options: &RunOptions) -> Result<Self>
    where
        T: Transport<Conn = C>,
    {
        let conn = match timeout(options.connect_timeout, transport.connect(endpoint)).await {
            Ok(conn) => conn?,
            Err(_) => {
                return Err(HarnessError::Connect(format!(
                    "{}: handshake did not complete within {:?}",
                    endpoint, options.connect_timeout
                )))
            }
        };

        Ok(Self {
            conn: Some(conn),
            state: SessionState::Open,
            options: options.clone(),
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn send(&mut self, descriptor: &RequestDescriptor) -> Result<()> {
        let payload = descriptor.to_payload()?;

        if self.options.verbose {
            info!("Sending request {}", payload);
        }

        let after = self.options.timeout;
        let conn = self.usable()?;
        let result = match timeout(after, conn.send_text(payload)).await {
            Ok(result) => result,
            Err(_) => Err(HarnessError::Timeout {
                op: Operation::Send,
                after,
            }),
        };

        self.settle(result)
    }

    pub async fn receive(&mut self) -> Result<String> {
        if self.options.verbose {
            info!("Awaiting result");
        }

        let after = self.options.timeout;
        let conn = self.usable()?;
        let result = match timeout(after, conn.recv_text()).await {
            Ok(result) => result,
            Err(_) => Err(HarnessError::Timeout {
                op: Operation::Receive,
                after,
            }),
        };

        let response = self.settle(result)?;

        if self.options.verbose {
            info!("{}", response);
        }

        Ok(response)
    }

    /// One request followed by its response, nothing else in flight on this session.
    pub async fn call(&mut self, descriptor: &RequestDescriptor) -> Result<String> {
        self.send(descriptor).await?;
        self.receive().await
    }

    /**
     * Releases the connection. Safe to call any number of times, only the first call
     * touches the connection and failures are logged rather than returned.
     */
    pub async fn close(&mut self) {
        let Some(mut conn) = self.conn.take() else {
            return;
        };

        match timeout(self.options.timeout, conn.close()).await {
            Ok(Ok(())) => debug!("Session closed"),
            Ok(Err(e)) => debug!("Error while closing session: {}", e),
            Err(_) => warn!("Close handshake timed out, dropping connection"),
        }

        self.state = SessionState::Closed;
    }

    fn usable(&mut self) -> Result<&mut C> {
        match (self.state, self.conn.as_mut()) {
            (SessionState::Open, Some(conn)) => Ok(conn),
            (state, _) => Err(HarnessError::Transport(format!(
                "Session is not usable in state {:?}",
                state
            ))),
        }
    }

    fn settle<R>(&mut self, result: Result<R>) -> Result<R> {
        if result.is_err() {
            self.state = SessionState::Faulted;
        }

        result
    }
}
