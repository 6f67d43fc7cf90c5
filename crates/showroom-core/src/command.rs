// ── Command API ──
//
// Write operations. Unlike intents these talk to the backend directly
// and report their own outcome; the store is refreshed afterwards.

use crate::model::{Contact, ContactDraft, Vehicle, VehicleDraft};

/// A write against the dealership backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Contacts ─────────────────────────────────────────────────────
    AddContact(ContactDraft),
    UpdateContact { id: String, draft: ContactDraft },
    DeleteContacts { ids: Vec<String> },
    RefreshContacts,

    // ── Inventory ────────────────────────────────────────────────────
    AddVehicle(VehicleDraft),
    UpdateVehicle { id: String, draft: VehicleDraft },
    DeleteVehicles { ids: Vec<String> },
    RefreshInventory,
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    Ok,
    Contact(Contact),
    Vehicle(Vehicle),
}
