// showroom-core: Reactive filter-state model and effect scheduler between showroom-api and consumers.

pub mod backend;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod intent;
pub mod model;
pub mod query;
pub mod scheduler;
pub mod store;
pub mod stream;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::Backend;
pub use command::{Command, CommandResult};
pub use config::{CoreConfig, FacetVocabulary};
pub use controller::Controller;
pub use error::CoreError;
pub use intent::Intent;
pub use query::{Facet, QueryView, RangeField, RangeFilter};
pub use scheduler::{Concern, PendingRequest};
pub use store::{AppState, Store};
pub use stream::StateStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Wire entities
    Contact, ContactConflict, ContactDraft, Credentials, InventorySearch, Registration,
    SalesWindow, User, Vehicle, VehicleDraft, VehicleImage, VehicleStatus,
    // Client state
    Alert, AlertLevel, AuthMode, DateWindow, LoadStatus, MonthlySales, Table,
};
