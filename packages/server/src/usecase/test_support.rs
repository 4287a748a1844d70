//! Test doubles shared by use case tests.

use std::{
    net::{IpAddr, Ipv4Addr},
    sync::{Arc, Mutex as StdMutex},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ClientId, DisplayName, Identity, Lobby, LobbyRepository, MessagePushError, MessagePusher,
        PusherChannel, ServerEvent, SourceAddress, Timestamp,
    },
    infrastructure::repository::InMemoryLobbyRepository,
};

/// MessagePusher that records every pushed event instead of sending it
#[derive(Default)]
pub struct RecordingPusher {
    pushed: StdMutex<Vec<(ClientId, ServerEvent)>>,
    registered: StdMutex<Vec<ClientId>>,
}

impl RecordingPusher {
    pub fn events_for(&self, client_id: &ClientId) -> Vec<ServerEvent> {
        self.pushed
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == client_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn all_events(&self) -> Vec<(ClientId, ServerEvent)> {
        self.pushed.lock().unwrap().clone()
    }

    pub fn registered(&self) -> Vec<ClientId> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, client_id: ClientId, _sender: PusherChannel) {
        self.registered.lock().unwrap().push(client_id);
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        self.registered.lock().unwrap().retain(|id| id != client_id);
    }

    async fn push_to(
        &self,
        client_id: &ClientId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.pushed
            .lock()
            .unwrap()
            .push((client_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut pushed = self.pushed.lock().unwrap();
        for target in targets {
            pushed.push((target, event.clone()));
        }
        Ok(())
    }
}

pub fn create_test_repository() -> Arc<InMemoryLobbyRepository> {
    create_test_repository_with_cap(5)
}

pub fn create_test_repository_with_cap(cap: usize) -> Arc<InMemoryLobbyRepository> {
    Arc::new(InMemoryLobbyRepository::new(Arc::new(Mutex::new(
        Lobby::new(cap),
    ))))
}

pub fn test_address() -> SourceAddress {
    SourceAddress::new(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Connect a client and optionally give it a display name.
pub async fn join(repository: &InMemoryLobbyRepository, name: Option<&str>) -> Identity {
    let identity = repository
        .connect(test_address(), Timestamp::new(1000))
        .await
        .unwrap();
    match name {
        Some(name) => repository
            .set_display_name(
                &identity.id,
                DisplayName::try_from(name.to_string()).unwrap(),
            )
            .await
            .unwrap(),
        None => identity,
    }
}
