use crate::error::Error;
use crate::registry::canonical_name;
use serde::Deserialize;
use serde_json::{Map, Value};

/// A validated add/update batch: canonical names paired with address strings,
/// in the order they appeared in the request body. `serde_json`'s
/// `preserve_order` feature keeps [`Map`] in document order, which the partial
/// batch semantics of the update operation depend on.
#[derive(Debug)]
pub(super) struct UpsertBatch(pub Vec<(String, String)>);

impl TryFrom<Map<String, Value>> for UpsertBatch {
    type Error = Error;

    fn try_from(payload: Map<String, Value>) -> Result<Self, Error> {
        let mut pairs = Vec::with_capacity(payload.len());
        for (name, value) in payload {
            match value {
                Value::String(address) => {
                    pairs.push((canonical_name(&name).to_string(), address));
                }
                _ => return Err(Error::InvalidEntry(name)),
            }
        }
        Ok(UpsertBatch(pairs))
    }
}

/// Query parameters of the delete operation. Either or both may be given;
/// an omitted parameter matches nothing.
#[derive(Deserialize, Debug, Clone, Default)]
pub(super) struct DeleteParams {
    pub domain: Option<String>,
    pub address: Option<String>,
}
