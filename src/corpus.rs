use lazy_static::lazy_static;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::Result;

pub const JSONRPC_VERSION: &str = "2.0";

// Every request in a run carries the same id. Responses are never correlated, the
// harness only ever waits for the next frame on a strictly serialized session.
pub const JSONRPC_ID: u64 = 2;

pub const NAME_LENGTH: usize = 10;

pub const COST_METHOD: &str = "embedded.pillar.getQsrRegistrationCost";
pub const NAME_AVAILABILITY_METHOD: &str = "embedded.pillar.checkNameAvailability";
pub const LIST_METHOD: &str = "embedded.pillar.getAll";

lazy_static! {
    /// Drawn once per process, shared by every name-availability request of the run.
    static ref RANDOM_NAME: String = random_string(NAME_LENGTH);

    static ref CATALOG: [RequestDescriptor; 3] = [
        RequestDescriptor::new(COST_METHOD, vec![]),
        RequestDescriptor::new(NAME_AVAILABILITY_METHOD, vec![Value::String(RANDOM_NAME.clone())]),
        RequestDescriptor::new(LIST_METHOD, vec![json!(0), json!(1)]),
    ];
}

fn random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// A single JSON-RPC call, method plus positional params.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: String,
    pub params: Vec<Value>,
}

#[derive(Serialize)]
struct Envelope<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a [Value],
}

impl RequestDescriptor {
    pub fn new(method: &str, params: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            params,
        }
    }

    /// Serializes the descriptor into its JSON-RPC 2.0 request envelope.
    pub fn to_payload(&self) -> Result<String> {
        let envelope = Envelope {
            jsonrpc: JSONRPC_VERSION,
            id: JSONRPC_ID,
            method: &self.method,
            params: &self.params,
        };

        Ok(serde_json::to_string(&envelope)?)
    }
}

pub type RequestCorpus = Vec<RequestDescriptor>;

pub fn catalog() -> &'static [RequestDescriptor] {
    CATALOG.as_slice()
}

pub fn random_name() -> &'static str {
    RANDOM_NAME.as_str()
}

/**
 * Builds a corpus of exactly `count` requests by repeating the catalog and cutting the
 * tail off.
 */
pub fn build_corpus(count: usize) -> RequestCorpus {
    let mut corpus = Vec::with_capacity(count + CATALOG.len());

    while corpus.len() < count {
        corpus.extend_from_slice(catalog());
    }

    corpus.truncate(count);
    corpus
}
