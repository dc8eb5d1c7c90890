pub mod enums;
pub mod report;
pub mod user;

pub use enums::*;
pub use report::*;
pub use user::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Server identifiers are opaque to the client. The backend emits integers
/// today; the contract only promises "an identifier", so both JSON numbers
/// and strings decode into the same string representation.
pub(crate) mod opaque_id {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &String, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum IdRepr {
            Num(i64),
            Str(String),
        }

        Ok(match IdRepr::deserialize(de)? {
            IdRepr::Num(n) => n.to_string(),
            IdRepr::Str(s) => s,
        })
    }
}
