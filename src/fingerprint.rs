use sha2::{Digest, Sha256};

use crate::models::{CorrelationId, ParsedTransaction};

pub fn correlation_id(tx: &ParsedTransaction) -> CorrelationId {
    correlation_id_for(&tx.iban, &tx.bic)
}

/// SHA-256 over the UTF-8 bytes of `iban` followed directly by `bic`.
pub fn correlation_id_for(iban: &str, bic: &str) -> CorrelationId {
    let mut hasher = Sha256::new();
    hasher.update(iban.as_bytes());
    hasher.update(bic.as_bytes());
    CorrelationId(hex::encode(hasher.finalize()))
}
