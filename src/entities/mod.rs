//! SeaORM entities for the decision flow engine's storage schema.

pub mod decision_flows;
pub mod symbolic_events;
pub mod users;

pub mod prelude {
    pub use super::decision_flows::Entity as DecisionFlows;
    pub use super::symbolic_events::Entity as SymbolicEvents;
    pub use super::users::Entity as Users;
}
