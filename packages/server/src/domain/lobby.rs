//! Lobby aggregate
//!
//! Owns the active connection set, the per-address connection counters and
//! the call book. The infrastructure layer keeps exactly one `Lobby` behind a
//! single mutex, so every method here runs with exclusive access.

use std::collections::HashMap;

use super::{
    call::{CallAction, CallBook, CallOutcome, CallTransition},
    entity::{Departure, Identity, Profile},
    error::RepositoryError,
    factory::ClientIdFactory,
    value_object::{ClientId, DisplayName, SourceAddress, Timestamp},
};

/// Default cap on concurrent connections from one source address
pub const DEFAULT_MAX_CONNECTIONS_PER_ADDRESS: usize = 5;

/// Consistent view of presence taken under one lock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSnapshot {
    /// Named identities in registration order
    pub active: Vec<Profile>,
    /// Every live identity, named or not
    pub recipients: Vec<Profile>,
}

#[derive(Debug, Clone)]
pub struct Lobby {
    identities: HashMap<ClientId, Identity>,
    address_counts: HashMap<SourceAddress, usize>,
    calls: CallBook,
    max_connections_per_address: usize,
    next_sequence: u64,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONNECTIONS_PER_ADDRESS)
    }
}

impl Lobby {
    pub fn new(max_connections_per_address: usize) -> Self {
        Self {
            identities: HashMap::new(),
            address_counts: HashMap::new(),
            calls: CallBook::new(),
            max_connections_per_address,
            next_sequence: 0,
        }
    }

    // ---------------------------------------------------------------------
    // Admission
    // ---------------------------------------------------------------------

    /// Take a connection slot for `address`. Returns `false` once the cap is reached.
    pub fn admit(&mut self, address: SourceAddress) -> bool {
        let count = self.address_counts.entry(address).or_insert(0);
        if *count >= self.max_connections_per_address {
            if *count == 0 {
                self.address_counts.remove(&address);
            }
            return false;
        }
        *count += 1;
        true
    }

    /// Give back a slot taken by `admit`. Never goes below zero.
    pub fn release(&mut self, address: SourceAddress) {
        if let Some(count) = self.address_counts.get_mut(&address) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.address_counts.remove(&address);
            }
        }
    }

    pub fn connections_from(&self, address: &SourceAddress) -> usize {
        self.address_counts.get(address).copied().unwrap_or(0)
    }

    // ---------------------------------------------------------------------
    // Registry
    // ---------------------------------------------------------------------

    /// Create an identity with a fresh id that no live identity uses.
    pub fn register(&mut self, address: SourceAddress, connected_at: Timestamp) -> Identity {
        self.register_with(address, connected_at, ClientIdFactory::generate)
    }

    pub(crate) fn register_with<F>(
        &mut self,
        address: SourceAddress,
        connected_at: Timestamp,
        mut generate: F,
    ) -> Identity
    where
        F: FnMut() -> ClientId,
    {
        let id = loop {
            let candidate = generate();
            if !self.identities.contains_key(&candidate) {
                break candidate;
            }
            tracing::debug!("Generated client id '{}' is taken, retrying", candidate);
        };
        let identity = Identity::new(id.clone(), address, connected_at, self.next_sequence);
        self.next_sequence += 1;
        self.identities.insert(id, identity.clone());
        identity
    }

    /// Admit and register in one step.
    pub fn connect(
        &mut self,
        address: SourceAddress,
        connected_at: Timestamp,
    ) -> Result<Identity, RepositoryError> {
        if !self.admit(address) {
            return Err(RepositoryError::AdmissionRejected(address.to_string()));
        }
        Ok(self.register(address, connected_at))
    }

    /// Set (or overwrite) the display name of a live identity.
    pub fn set_display_name(
        &mut self,
        id: &ClientId,
        name: DisplayName,
    ) -> Result<Identity, RepositoryError> {
        let identity = self
            .identities
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ClientNotFound(id.as_str().to_string()))?;
        identity.display_name = Some(name);
        Ok(identity.clone())
    }

    /// Remove an identity and tear down any call it was part of.
    ///
    /// Returns `None` when the identity was already gone.
    pub fn unregister(&mut self, id: &ClientId) -> Option<Departure> {
        let identity = self.identities.remove(id)?;
        let call_peer = self.calls.hang_up(id);
        Some(Departure {
            identity,
            call_peer,
        })
    }

    /// Unregister and release the admission slot. Idempotent: the slot is
    /// only released when the identity was still registered.
    pub fn disconnect(&mut self, id: &ClientId) -> Option<Departure> {
        let departure = self.unregister(id)?;
        self.release(departure.identity.address);
        Some(departure)
    }

    pub fn identity(&self, id: &ClientId) -> Option<&Identity> {
        self.identities.get(id)
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.identities.contains_key(id)
    }

    pub fn connection_count(&self) -> usize {
        self.identities.len()
    }

    /// Every live id, named or not, in registration order
    pub fn client_ids(&self) -> Vec<ClientId> {
        let mut identities: Vec<&Identity> = self.identities.values().collect();
        identities.sort_by_key(|identity| identity.sequence);
        identities.into_iter().map(|identity| identity.id.clone()).collect()
    }

    /// Named identities in registration order. Unnamed lurkers are excluded.
    pub fn list_active(&self) -> Vec<Identity> {
        let mut active: Vec<Identity> = self
            .identities
            .values()
            .filter(|identity| identity.is_named())
            .cloned()
            .collect();
        active.sort_by_key(|identity| identity.sequence);
        active
    }

    pub fn presence_snapshot(&self) -> PresenceSnapshot {
        let mut recipients: Vec<&Identity> = self.identities.values().collect();
        recipients.sort_by_key(|identity| identity.sequence);
        PresenceSnapshot {
            active: self.list_active().iter().map(Identity::profile).collect(),
            recipients: recipients.into_iter().map(Identity::profile).collect(),
        }
    }

    // ---------------------------------------------------------------------
    // Calls
    // ---------------------------------------------------------------------

    pub fn calls(&self) -> &CallBook {
        &self.calls
    }

    /// Apply a call event. Events towards identities that are not connected
    /// are dropped without touching the call book.
    pub fn apply_call(
        &mut self,
        action: CallAction,
        actor: &ClientId,
        target: &ClientId,
    ) -> CallOutcome {
        let (Some(actor_identity), Some(target_identity)) =
            (self.identities.get(actor), self.identities.get(target))
        else {
            return CallOutcome::TargetUnavailable;
        };
        let actor_profile = actor_identity.profile();
        let target_profile = target_identity.profile();

        match self.calls.apply(action, actor, target) {
            CallTransition::Applied => CallOutcome::Applied {
                actor: actor_profile,
                target: target_profile,
            },
            CallTransition::Busy => CallOutcome::Busy {
                actor: actor_profile,
                target: target_profile,
            },
            CallTransition::Ignored => CallOutcome::Ignored,
        }
    }
}
