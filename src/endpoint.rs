use std::fmt;
use std::str::FromStr;

use crate::error::HarnessError;

pub const HOST_FORMAT: &str =
    "Hostformat: protocol://domain:port e.g. ws://my.domain.com:8080. Proto may be ws or wss.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Ws,
    Wss,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Ws => write!(f, "ws"),
            Scheme::Wss => write!(f, "wss"),
        }
    }
}

/// Target address of the form `scheme://host:port`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let usage = || HarnessError::Usage(HOST_FORMAT.to_string());

        let parts: Vec<&str> = s.split(':').collect();
        let [scheme, host, port] = parts.as_slice() else {
            return Err(usage());
        };

        let scheme = match *scheme {
            "ws" => Scheme::Ws,
            "wss" => Scheme::Wss,
            _ => return Err(usage()),
        };

        let host = match host.strip_prefix("//") {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(usage()),
        };

        let port = port.parse::<u16>().map_err(|_| usage())?;

        Ok(Endpoint { scheme, host, port })
    }
}
