//! Whole-store export.

use crate::error::Result;
use crate::store::{KeyValueStore, Map, ValueKind};

/// Every stored key mapped to its value, as one flat JSON object.
///
/// Value spaces are concatenated in the order strings, numbers, maps, arrays.
pub fn dump<S: KeyValueStore + ?Sized>(store: &S) -> Result<Map> {
    let mut object = Map::new();
    for kind in ValueKind::ALL {
        for (key, value) in store.get_all(kind)? {
            object.insert(key, serde_json::to_value(value)?);
        }
    }
    Ok(object)
}

/// [`dump`] serialized to a JSON string.
pub fn dump_json<S: KeyValueStore + ?Sized>(store: &S) -> Result<String> {
    Ok(serde_json::to_string(&dump(store)?)?)
}
