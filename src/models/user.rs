use serde::{Deserialize, Serialize};

use super::enums::UserRole;
use super::opaque_id;

/// A registered clinic user. Immutable once cached; never deleted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(with = "opaque_id")]
    pub user_id: String,
    pub name: String,
    /// Login key. The register endpoint omits it from its response; the
    /// session manager backfills it from the submitted form.
    #[serde(default)]
    pub mobile_number: String,
    pub role: UserRole,
}
