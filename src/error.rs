use crate::airport::HubKey;
use crate::flight::FlightId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("unknown hub: {0}")]
    UnknownHub(HubKey),
    #[error("no flight {id} at hub {hub}")]
    UnknownFlight { hub: HubKey, id: FlightId },
    #[error("invalid time: {0:?}")]
    InvalidTime(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BankError>;
