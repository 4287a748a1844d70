pub mod lobby;

pub use lobby::InMemoryLobbyRepository;
