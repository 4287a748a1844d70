//! Identifier generation

use uuid::Uuid;

use super::value_object::ClientId;

/// Number of UUID hex characters kept in a client id
pub const CLIENT_ID_LEN: usize = 8;

/// Generates short client ids derived from a random UUID.
///
/// Short ids can collide; `Lobby::register` re-draws until the id is unused
/// among live identities.
pub struct ClientIdFactory;

impl ClientIdFactory {
    pub fn generate() -> ClientId {
        let simple = Uuid::new_v4().simple().to_string();
        ClientId(simple[..CLIENT_ID_LEN].to_string())
    }
}
