use log::debug;

use crate::config::RunOptions;
use crate::corpus::RequestCorpus;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::session::Session;
use crate::transport::Transport;

/// Runs a whole corpus over one connection, strictly one call at a time.
#[derive(Clone, Debug)]
pub struct SingleSessionRunner {
    endpoint: Endpoint,
    corpus: RequestCorpus,
}

impl SingleSessionRunner {
    pub fn new(endpoint: Endpoint, corpus: RequestCorpus) -> Self {
        Self { endpoint, corpus }
    }

    pub fn corpus(&self) -> &RequestCorpus {
        &self.corpus
    }

    /**
     * Opens the session, issues every request in order and closes the session again.
     * The first failing send or receive aborts the remaining requests, the session is
     * closed on that path as well.
     */
    pub async fn run<T: Transport>(&self, transport: &T, options: &RunOptions) -> Result<()> {
        let mut session = Session::open(transport, &self.endpoint, options).await?;

        let mut result = Ok(());
        for (i, descriptor) in self.corpus.iter().enumerate() {
            if let Err(e) = session.call(descriptor).await {
                debug!("Request {} of {} failed: {}", i + 1, self.corpus.len(), e);
                result = Err(e);
                break;
            }
        }

        session.close().await;
        result
    }
}
