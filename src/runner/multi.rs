use log::debug;

use crate::config::RunOptions;
use crate::corpus::RequestCorpus;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::session::Session;
use crate::transport::Transport;

/// Runs a corpus sequentially, opening and closing a fresh connection for every request.
#[derive(Clone, Debug)]
pub struct MultiSessionRunner {
    endpoint: Endpoint,
    corpus: RequestCorpus,
}

impl MultiSessionRunner {
    pub fn new(endpoint: Endpoint, corpus: RequestCorpus) -> Self {
        Self { endpoint, corpus }
    }

    pub fn corpus(&self) -> &RequestCorpus {
        &self.corpus
    }

    pub async fn run<T: Transport>(&self, transport: &T, options: &RunOptions) -> Result<()> {
        for (i, descriptor) in self.corpus.iter().enumerate() {
            let mut session = Session::open(transport, &self.endpoint, options).await?;

            let result = session.call(descriptor).await;
            session.close().await;

            if let Err(e) = result {
                debug!("Request {} of {} failed: {}", i + 1, self.corpus.len(), e);
                return Err(e);
            }
        }

        Ok(())
    }
}
