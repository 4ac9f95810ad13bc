//! Repository layer (C8): SeaORM-backed data access for flows, the
//! symbolic-run telemetry window, and user accounts.

pub mod flow_repository;
pub mod symbolic_event_repository;
pub mod traits;
pub mod user_repository;

pub use flow_repository::FlowSeaOrmRepository;
pub use symbolic_event_repository::SymbolicEventSeaOrmRepository;
pub use traits::{FlowRepository, SymbolicEventRepository, UserRepository};
pub use user_repository::UserSeaOrmRepository;
