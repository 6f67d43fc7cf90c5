// showroom-api: Async Rust client for the Showroom dealership backend.

pub mod auth;
pub mod client;
pub mod contacts;
pub mod error;
pub mod models;
pub mod transport;
pub mod vehicles;

pub use client::ApiClient;
pub use error::Error;
pub use models::{
    Contact, ContactConflict, ContactDraft, Credentials, InventorySearch, Registration,
    SalesWindow, User, Vehicle, VehicleDraft, VehicleImage, VehicleStatus,
};
pub use transport::{DEFAULT_TIMEOUT, TlsMode, Transport, TransportConfig};
