#![allow(clippy::unwrap_used)]

// Controller tests against a scripted in-memory backend.
//
// The fake ignores cancellation tokens so superseded fetches resolve
// late, exactly like a backend that never hears about the abort.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use showroom_core::model::FALLBACK_ALERT_MESSAGE;
use showroom_core::{
    AlertLevel, Backend, Command, CommandResult, Concern, Contact, ContactConflict, ContactDraft,
    Controller, CoreConfig, CoreError, Credentials, Intent, InventorySearch, LoadStatus,
    Registration, SalesWindow, Table, User, Vehicle, VehicleDraft, VehicleImage, VehicleStatus,
};

// ── Fixtures ────────────────────────────────────────────────────────

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn user(verified: bool) -> User {
    User {
        id: "u1".into(),
        name: "Owner".into(),
        email: "owner@dealer.id".into(),
        verified,
        dealership: Some("Maju Motor".into()),
    }
}

fn vehicle(id: &str, make: &str, model: &str, price: i64) -> Vehicle {
    Vehicle {
        id: id.into(),
        make: make.into(),
        model: model.into(),
        year: 2021,
        price,
        odometer: 12_000,
        condition: "Used".into(),
        status: VehicleStatus::Available,
        body_type: "Hatchback".into(),
        assembly: "CKD".into(),
        fuel_type: "Gasoline".into(),
        transmission: "Automatic".into(),
        buyer_id: None,
        sold_price: None,
        sold_date: None,
        images: Vec::new(),
        specification: Vec::new(),
        account_id: None,
    }
}

fn sold(id: &str, price: i64, date: &str) -> Vehicle {
    Vehicle {
        status: VehicleStatus::Sold,
        sold_price: Some(price),
        sold_date: Some(at(date)),
        ..vehicle(id, "Toyota", "Avanza", price + 10)
    }
}

fn contact(id: &str, name: &str) -> Contact {
    Contact {
        id: id.into(),
        name: name.into(),
        mobile: "0812 3456 7890".into(),
        email: None,
        address: None,
        instagram: None,
        facebook: None,
    }
}

fn credentials() -> Credentials {
    Credentials {
        email: "owner@dealer.id".into(),
        password: SecretString::from("hunter22"),
    }
}

/// Failure modes the fake can be told to produce.
#[derive(Debug, Clone, Copy)]
enum Fail {
    Unauthorized,
    Server(&'static str),
    Timeout,
}

impl Fail {
    fn error(self) -> CoreError {
        match self {
            Self::Unauthorized => CoreError::SessionExpired,
            Self::Server(message) => CoreError::Api {
                message: Some(message.into()),
                status: Some(500),
            },
            Self::Timeout => CoreError::Timeout,
        }
    }
}

// ── Scripted backend ────────────────────────────────────────────────

struct FakeBackend {
    session: AtomicBool,
    user: User,
    login_failure: Mutex<Option<Fail>>,
    vehicles: Mutex<Vec<Vehicle>>,
    sales: Vec<Vehicle>,
    contacts: Mutex<Vec<Contact>>,
    images: Vec<VehicleImage>,
    list_vehicles_failure: Mutex<Option<Fail>>,
    list_contacts_failure: Mutex<Option<Fail>>,
    write_failure: Mutex<Option<Fail>>,
    delete_conflict: Mutex<Option<ContactConflict>>,
    /// Held vehicle searches, keyed by search text.
    vehicle_gates: Mutex<HashMap<String, oneshot::Receiver<Vec<Vehicle>>>>,
    /// Held contact searches, keyed by search text.
    contact_gates: Mutex<HashMap<String, oneshot::Receiver<Vec<Contact>>>>,
    /// Held sales fetches, keyed by exact window bounds.
    sales_gates: Mutex<HashMap<(DateTime<Utc>, DateTime<Utc>), oneshot::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            session: AtomicBool::new(false),
            user: user(true),
            login_failure: Mutex::new(None),
            vehicles: Mutex::new(vec![
                vehicle("v1", "Toyota", "Yaris", 250_000_000),
                vehicle("v2", "Toyota", "Avanza", 230_000_000),
                vehicle("v3", "Honda", "Jazz", 240_000_000),
            ]),
            sales: Vec::new(),
            contacts: Mutex::new(vec![contact("c1", "Budi"), contact("c2", "Sari")]),
            images: vec![VehicleImage {
                id: "i1".into(),
                url: "https://cdn.example/i1.jpg".into(),
            }],
            list_vehicles_failure: Mutex::new(None),
            list_contacts_failure: Mutex::new(None),
            write_failure: Mutex::new(None),
            delete_conflict: Mutex::new(None),
            vehicle_gates: Mutex::new(HashMap::new()),
            contact_gates: Mutex::new(HashMap::new()),
            sales_gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn hold_vehicle_search(&self, text: &str) -> oneshot::Sender<Vec<Vehicle>> {
        let (tx, rx) = oneshot::channel();
        self.vehicle_gates.lock().unwrap().insert(text.into(), rx);
        tx
    }

    fn hold_contact_search(&self, text: &str) -> oneshot::Sender<Vec<Contact>> {
        let (tx, rx) = oneshot::channel();
        self.contact_gates.lock().unwrap().insert(text.into(), rx);
        tx
    }

    fn hold_sales(&self, start: &str, end: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.sales_gates.lock().unwrap().insert((at(start), at(end)), rx);
        tx
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn called(&self, call: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    fn fail(slot: &Mutex<Option<Fail>>) -> Result<(), CoreError> {
        match *slot.lock().unwrap() {
            Some(fail) => Err(fail.error()),
            None => Ok(()),
        }
    }
}

impl Backend for FakeBackend {
    fn has_session(&self) -> bool {
        self.session.load(Ordering::SeqCst)
    }

    fn login<'a>(&'a self, _credentials: &'a Credentials) -> BoxFuture<'a, Result<User, CoreError>> {
        async move {
            self.record("login");
            Self::fail(&self.login_failure)?;
            self.session.store(true, Ordering::SeqCst);
            Ok(self.user.clone())
        }
        .boxed()
    }

    fn register<'a>(
        &'a self,
        registration: &'a Registration,
    ) -> BoxFuture<'a, Result<User, CoreError>> {
        async move {
            self.record("register");
            self.session.store(true, Ordering::SeqCst);
            Ok(User {
                name: registration.name.clone(),
                email: registration.email.clone(),
                verified: false,
                ..self.user.clone()
            })
        }
        .boxed()
    }

    fn logout(&self) -> BoxFuture<'_, Result<(), CoreError>> {
        async move {
            self.record("logout");
            self.session.store(false, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }

    fn list_vehicles<'a>(
        &'a self,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move {
            self.record("list_vehicles");
            Self::fail(&self.list_vehicles_failure)?;
            Ok(self.vehicles.lock().unwrap().clone())
        }
        .boxed()
    }

    fn search_vehicles<'a>(
        &'a self,
        query: &'a InventorySearch,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move {
            self.record("search_vehicles");
            let gate = self.vehicle_gates.lock().unwrap().remove(&query.search);
            match gate {
                Some(gate) => gate.await.map_err(|_| CoreError::Cancelled),
                None => Ok(self
                    .vehicles
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|v| query.makes.contains(&v.make))
                    .cloned()
                    .collect()),
            }
        }
        .boxed()
    }

    fn vehicle_sales<'a>(
        &'a self,
        window: SalesWindow,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Vehicle>, CoreError>> {
        async move {
            self.record("vehicle_sales");
            let gate = self
                .sales_gates
                .lock()
                .unwrap()
                .remove(&(window.start_date, window.end_date));
            if let Some(gate) = gate {
                gate.await.map_err(|_| CoreError::Cancelled)?;
            }
            Ok(self
                .sales
                .iter()
                .filter(|v| {
                    v.sold_date
                        .is_some_and(|d| d >= window.start_date && d < window.end_date)
                })
                .cloned()
                .collect())
        }
        .boxed()
    }

    fn vehicle_images<'a>(
        &'a self,
        _vehicle_id: &'a str,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<VehicleImage>, CoreError>> {
        async move {
            self.record("vehicle_images");
            Ok(self.images.clone())
        }
        .boxed()
    }

    fn add_vehicle<'a>(
        &'a self,
        draft: &'a VehicleDraft,
    ) -> BoxFuture<'a, Result<Vehicle, CoreError>> {
        async move {
            self.record("add_vehicle");
            Self::fail(&self.write_failure)?;
            let mut vehicles = self.vehicles.lock().unwrap();
            let created = Vehicle {
                id: format!("v{}", vehicles.len() + 1),
                ..vehicle("", &draft.make, &draft.model, draft.price)
            };
            vehicles.push(created.clone());
            Ok(created)
        }
        .boxed()
    }

    fn update_vehicle<'a>(
        &'a self,
        id: &'a str,
        draft: &'a VehicleDraft,
    ) -> BoxFuture<'a, Result<Vehicle, CoreError>> {
        async move {
            self.record("update_vehicle");
            Self::fail(&self.write_failure)?;
            Ok(vehicle(id, &draft.make, &draft.model, draft.price))
        }
        .boxed()
    }

    fn delete_vehicles<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>> {
        async move {
            self.record("delete_vehicles");
            Self::fail(&self.write_failure)?;
            self.vehicles.lock().unwrap().retain(|v| !ids.contains(&v.id));
            Ok(())
        }
        .boxed()
    }

    fn list_contacts<'a>(
        &'a self,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>> {
        async move {
            self.record("list_contacts");
            Self::fail(&self.list_contacts_failure)?;
            Ok(self.contacts.lock().unwrap().clone())
        }
        .boxed()
    }

    fn search_contacts<'a>(
        &'a self,
        search: &'a str,
        _cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Result<Vec<Contact>, CoreError>> {
        async move {
            self.record("search_contacts");
            let gate = self.contact_gates.lock().unwrap().remove(search);
            match gate {
                Some(gate) => gate.await.map_err(|_| CoreError::Cancelled),
                None => Ok(self
                    .contacts
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|c| c.name.to_lowercase().contains(&search.to_lowercase()))
                    .cloned()
                    .collect()),
            }
        }
        .boxed()
    }

    fn add_contact<'a>(
        &'a self,
        draft: &'a ContactDraft,
    ) -> BoxFuture<'a, Result<Contact, CoreError>> {
        async move {
            self.record("add_contact");
            Self::fail(&self.write_failure)?;
            let mut contacts = self.contacts.lock().unwrap();
            let created = Contact {
                id: format!("c{}", contacts.len() + 1),
                name: draft.name.clone(),
                mobile: draft.mobile.clone(),
                email: draft.email.clone(),
                address: None,
                instagram: None,
                facebook: None,
            };
            contacts.push(created.clone());
            Ok(created)
        }
        .boxed()
    }

    fn update_contact<'a>(
        &'a self,
        id: &'a str,
        draft: &'a ContactDraft,
    ) -> BoxFuture<'a, Result<Contact, CoreError>> {
        async move {
            self.record("update_contact");
            Self::fail(&self.write_failure)?;
            Ok(Contact {
                name: draft.name.clone(),
                ..contact(id, &draft.name)
            })
        }
        .boxed()
    }

    fn delete_contacts<'a>(&'a self, ids: &'a [String]) -> BoxFuture<'a, Result<(), CoreError>> {
        async move {
            self.record("delete_contacts");
            if let Some(conflict) = self.delete_conflict.lock().unwrap().clone() {
                return Err(CoreError::ContactConflict(conflict));
            }
            self.contacts.lock().unwrap().retain(|c| !ids.contains(&c.id));
            Ok(())
        }
        .boxed()
    }
}

// ── Harness ─────────────────────────────────────────────────────────

fn setup(backend: FakeBackend) -> (Controller, Arc<FakeBackend>) {
    let backend = Arc::new(backend);
    let controller = Controller::new(CoreConfig::default(), backend.clone());
    (controller, backend)
}

async fn logged_in(backend: FakeBackend) -> (Controller, Arc<FakeBackend>) {
    let (controller, backend) = setup(backend);
    controller.login(&credentials()).await.unwrap();
    controller.settle().await;
    (controller, backend)
}

fn draft(name: &str, mobile: &str) -> ContactDraft {
    ContactDraft {
        name: name.into(),
        mobile: mobile.into(),
        ..ContactDraft::default()
    }
}

// ── Session activation ──────────────────────────────────────────────

#[tokio::test]
async fn login_loads_inventory_contacts_and_dashboard() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let state = controller.snapshot();

    assert!(state.is_active());
    assert_eq!(state.inventory.status, LoadStatus::Ready);
    assert_eq!(state.inventory.vehicles.len(), 3);
    let query = state.inventory.query.as_ref().unwrap();
    assert_eq!(query.makes_models().len(), 2);

    assert_eq!(state.contacts.status, LoadStatus::Ready);
    assert_eq!(state.contacts.contacts.len(), 2);

    assert!(state.dashboard.window.is_some());
    assert_eq!(state.dashboard.status, LoadStatus::Ready);

    assert_eq!(backend.called("list_vehicles"), 1);
    assert_eq!(backend.called("list_contacts"), 1);
    assert_eq!(backend.called("search_vehicles"), 0);
}

#[tokio::test]
async fn unverified_user_does_not_bootstrap() {
    let mut fake = FakeBackend::new();
    fake.user = user(false);
    let (controller, backend) = logged_in(fake).await;

    let state = controller.snapshot();
    assert!(state.is_authenticated());
    assert!(!state.is_active());
    assert_eq!(backend.called("list_vehicles"), 0);
    assert!(state.inventory.query.is_none());
}

#[tokio::test]
async fn rejected_login_reports_invalid_credentials() {
    let fake = FakeBackend::new();
    *fake.login_failure.lock().unwrap() = Some(Fail::Unauthorized);
    let (controller, _) = setup(fake);

    let err = controller.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, CoreError::AuthenticationFailed { .. }));

    let state = controller.snapshot();
    assert!(!state.is_authenticated());
    assert!(!state.auth_form.submitting);
    assert_eq!(
        state.auth_form.error.as_deref(),
        Some("Invalid email or password")
    );
}

#[tokio::test]
async fn registration_waits_for_verification() {
    let (controller, backend) = setup(FakeBackend::new());
    let registration = Registration {
        name: "New Owner".into(),
        email: "new@dealer.id".into(),
        password: SecretString::from("hunter22"),
        dealership: None,
    };

    let user = controller.register(&registration).await.unwrap();
    controller.settle().await;

    assert_eq!(user.email, "new@dealer.id");
    assert!(controller.snapshot().is_authenticated());
    assert_eq!(backend.called("list_vehicles"), 0);
}

#[tokio::test]
async fn restored_session_bootstraps() {
    let fake = FakeBackend::new();
    fake.session.store(true, Ordering::SeqCst);
    let (controller, backend) = setup(fake);

    controller.restore_session(user(true)).unwrap();
    controller.settle().await;

    assert_eq!(controller.snapshot().inventory.vehicles.len(), 3);
    assert_eq!(backend.called("login"), 0);
}

#[tokio::test]
async fn unauthorized_fetch_clears_the_session_silently() {
    let fake = FakeBackend::new();
    *fake.list_contacts_failure.lock().unwrap() = Some(Fail::Unauthorized);
    let (controller, _) = logged_in(fake).await;

    let state = controller.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.alerts.is_empty());
    assert!(state.inventory.query.is_none());
    assert!(controller.pending(Concern::Dashboard).is_none());
}

// ── Failure routing ─────────────────────────────────────────────────

#[tokio::test]
async fn failed_fetch_raises_server_message() {
    let fake = FakeBackend::new();
    *fake.list_vehicles_failure.lock().unwrap() = Some(Fail::Server("Inventory unavailable"));
    let (controller, _) = logged_in(fake).await;

    let state = controller.snapshot();
    assert_eq!(state.inventory.status, LoadStatus::Failed);
    assert_eq!(state.alerts.len(), 1);
    assert_eq!(state.alerts[0].level, AlertLevel::Error);
    assert_eq!(state.alerts[0].message, "Inventory unavailable");

    // Other concerns are unaffected.
    assert_eq!(state.contacts.status, LoadStatus::Ready);
}

#[tokio::test]
async fn failure_without_message_uses_fallback() {
    let fake = FakeBackend::new();
    *fake.list_contacts_failure.lock().unwrap() = Some(Fail::Timeout);
    let (controller, _) = logged_in(fake).await;

    let state = controller.snapshot();
    assert_eq!(state.contacts.status, LoadStatus::Failed);
    assert_eq!(state.alerts.len(), 1);
    assert_eq!(state.alerts[0].message, FALLBACK_ALERT_MESSAGE);
}

// ── Supersession ────────────────────────────────────────────────────

#[tokio::test]
async fn superseded_search_resolving_late_is_discarded() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let first = backend.hold_vehicle_search("ya");
    let second = backend.hold_vehicle_search("yaris");

    controller
        .dispatch(Intent::SetInventorySearch("ya".into()))
        .unwrap();
    controller
        .dispatch(Intent::SetInventorySearch("yaris".into()))
        .unwrap();

    let live = controller.pending(Concern::InventorySearch).unwrap();
    assert!(live.is_live());

    // Newer result lands first.
    second
        .send(vec![vehicle("v1", "Toyota", "Yaris", 250_000_000)])
        .unwrap();
    let mut stream = controller.stream();
    stream
        .wait_for(|s| s.inventory.vehicles.len() == 1)
        .await
        .unwrap();

    // Then the stale one.
    first
        .send(vec![
            vehicle("v1", "Toyota", "Yaris", 250_000_000),
            vehicle("v2", "Toyota", "Avanza", 230_000_000),
        ])
        .unwrap();
    controller.settle().await;

    let state = controller.snapshot();
    assert_eq!(state.inventory.vehicles.len(), 1);
    assert_eq!(state.inventory.vehicles[0].model, "Yaris");
    assert_eq!(state.inventory.status, LoadStatus::Ready);
    assert_eq!(state.inventory.query.as_ref().unwrap().search(), "yaris");
    assert!(state.alerts.is_empty());
}

#[tokio::test]
async fn filter_edit_searches_without_rebuilding() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let generation = controller.snapshot().inventory.generation;

    controller
        .dispatch(Intent::ToggleFacetValue {
            facet: showroom_core::Facet::Make,
            value: "Honda".into(),
        })
        .unwrap();
    controller.settle().await;

    let state = controller.snapshot();
    assert_eq!(backend.called("search_vehicles"), 1);
    assert_eq!(state.inventory.generation, generation);
    assert!(state.inventory.vehicles.iter().all(|v| v.make == "Toyota"));
    // The view still knows about Honda.
    assert!(
        state
            .inventory
            .query
            .as_ref()
            .unwrap()
            .makes_models()
            .contains_key("Honda")
    );
}

#[tokio::test]
async fn contact_search_keeps_only_latest_text() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let first = backend.hold_contact_search("bu");
    let second = backend.hold_contact_search("budi");

    controller
        .dispatch(Intent::SetContactSearch("bu".into()))
        .unwrap();
    controller
        .dispatch(Intent::SetContactSearch("budi".into()))
        .unwrap();

    first
        .send(vec![contact("c1", "Budi"), contact("c9", "Bunga")])
        .unwrap();
    second.send(vec![contact("c1", "Budi")]).unwrap();
    controller.settle().await;

    let state = controller.snapshot();
    assert_eq!(state.contacts.search, "budi");
    assert_eq!(*state.contacts.contacts, vec![contact("c1", "Budi")]);
}

#[tokio::test]
async fn logout_cancels_in_flight_requests() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let gate = backend.hold_vehicle_search("jazz");

    controller
        .dispatch(Intent::SetInventorySearch("jazz".into()))
        .unwrap();
    let request = controller.pending(Concern::InventorySearch).unwrap();

    controller.logout().await.unwrap();
    assert!(!request.is_live());
    assert!(controller.pending(Concern::InventorySearch).is_none());

    drop(gate);
    controller.settle().await;

    let state = controller.snapshot();
    assert!(!state.is_authenticated());
    assert!(state.inventory.vehicles.is_empty());
    assert!(state.alerts.is_empty());
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn date_range_change_reloads_monthly_breakdown() {
    let mut fake = FakeBackend::new();
    fake.sales = vec![
        sold("s1", 200_000_000, "2026-02-03T10:00:00Z"),
        sold("s2", 150_000_000, "2026-03-01T12:00:00Z"),
        sold("s3", 180_000_000, "2025-01-20T08:00:00Z"),
    ];
    let (controller, _) = logged_in(fake).await;

    controller
        .dispatch(Intent::SetDateRange {
            start: at("2026-01-15T00:00:00Z"),
            end: at("2026-03-10T00:00:00Z"),
        })
        .unwrap();
    controller.settle().await;

    let dashboard = &controller.snapshot().dashboard;
    assert_eq!(dashboard.status, LoadStatus::Ready);
    assert_eq!(dashboard.current_sales.len(), 2);
    assert_eq!(dashboard.past_sales.len(), 1);

    let units: Vec<usize> = dashboard.current_monthly.iter().map(|m| m.units).collect();
    assert_eq!(units, vec![0, 1, 1]);
    assert_eq!(dashboard.current_monthly[0].start, at("2026-01-15T00:00:00Z"));
    assert_eq!(dashboard.current_monthly[2].end, at("2026-03-10T00:00:00Z"));
    assert_eq!(dashboard.current_revenue(), 350_000_000);

    let past: Vec<usize> = dashboard.past_monthly.iter().map(|m| m.units).collect();
    assert_eq!(past, vec![1, 0, 0]);
    assert_eq!(dashboard.past_revenue(), 180_000_000);
}

#[tokio::test]
async fn superseded_dashboard_load_is_discarded() {
    let mut fake = FakeBackend::new();
    fake.sales = vec![
        sold("s1", 200_000_000, "2026-02-03T10:00:00Z"),
        sold("s2", 150_000_000, "2026-03-01T12:00:00Z"),
    ];
    let (controller, backend) = logged_in(fake).await;
    let first_gate = backend.hold_sales("2026-01-01T00:00:00Z", "2026-03-01T00:00:00Z");

    controller
        .dispatch(Intent::SetDateRange {
            start: at("2026-01-01T00:00:00Z"),
            end: at("2026-03-01T00:00:00Z"),
        })
        .unwrap();
    let first = controller.pending(Concern::Dashboard).unwrap();

    controller
        .dispatch(Intent::SetDateRange {
            start: at("2026-02-01T00:00:00Z"),
            end: at("2026-04-01T00:00:00Z"),
        })
        .unwrap();
    assert!(!first.is_live());
    assert!(controller.pending(Concern::Dashboard).unwrap().is_live());

    // The newer window lands first.
    let mut stream = controller.stream();
    stream
        .wait_for(|s| {
            s.dashboard
                .current_monthly
                .first()
                .is_some_and(|m| m.start == at("2026-02-01T00:00:00Z"))
        })
        .await
        .unwrap();

    // Then the stale one.
    first_gate.send(()).unwrap();
    controller.settle().await;

    let state = controller.snapshot();
    let dashboard = &state.dashboard;
    assert_eq!(dashboard.status, LoadStatus::Ready);
    assert_eq!(dashboard.window.unwrap().start, at("2026-02-01T00:00:00Z"));
    assert_eq!(dashboard.current_sales.len(), 2);
    let units: Vec<usize> = dashboard.current_monthly.iter().map(|m| m.units).collect();
    assert_eq!(units, vec![1, 1]);
    assert_eq!(dashboard.current_monthly[0].start, at("2026-02-01T00:00:00Z"));
    assert!(state.alerts.is_empty());
}

#[tokio::test]
async fn unverified_user_loads_dashboard_on_first_range() {
    let mut fake = FakeBackend::new();
    fake.user = user(false);
    fake.sales = vec![sold("s1", 200_000_000, "2026-02-03T10:00:00Z")];
    let (controller, backend) = logged_in(fake).await;
    assert!(controller.snapshot().dashboard.window.is_none());
    assert_eq!(backend.called("vehicle_sales"), 0);

    controller
        .dispatch(Intent::SetDateRange {
            start: at("2026-01-01T00:00:00Z"),
            end: at("2026-03-01T00:00:00Z"),
        })
        .unwrap();
    controller.settle().await;

    let dashboard = &controller.snapshot().dashboard;
    assert_eq!(dashboard.status, LoadStatus::Ready);
    assert_eq!(dashboard.current_sales.len(), 1);
    assert_eq!(backend.called("list_vehicles"), 0);
}

#[tokio::test]
async fn login_loads_dashboard_once() {
    let (_, backend) = logged_in(FakeBackend::new()).await;
    // Current and past totals plus one fetch per month of each window.
    let months = showroom_core::model::monthly_windows(SalesWindow {
        start_date: at("2026-01-01T00:00:00Z"),
        end_date: Utc::now(),
    })
    .len();
    assert_eq!(backend.called("vehicle_sales"), 2 + 2 * months);
}

// ── Vehicle detail ──────────────────────────────────────────────────

#[tokio::test]
async fn opening_a_vehicle_loads_its_images() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;

    controller
        .dispatch(Intent::SetCurrentVehicle(vehicle(
            "v1",
            "Toyota",
            "Yaris",
            250_000_000,
        )))
        .unwrap();
    controller.settle().await;

    let state = controller.snapshot();
    assert_eq!(backend.called("vehicle_images"), 1);
    assert_eq!(state.current_vehicle.as_ref().unwrap().images.len(), 1);
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn commands_require_a_session() {
    let (controller, backend) = setup(FakeBackend::new());
    let err = controller
        .execute(Command::AddContact(draft("Budi", "081234567890")))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    assert_eq!(backend.called("add_contact"), 0);
}

#[tokio::test]
async fn invalid_contact_never_reaches_backend() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let err = controller
        .execute(Command::AddContact(draft("Budi", "0812")))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert_eq!(backend.called("add_contact"), 0);
}

#[tokio::test]
async fn added_contact_appears_after_reload() {
    let (controller, _) = logged_in(FakeBackend::new()).await;
    let result = controller
        .execute(Command::AddContact(draft("Rina", "+62 812-3456-7890")))
        .await
        .unwrap();

    let CommandResult::Contact(created) = result else {
        panic!("expected a contact");
    };
    let state = controller.snapshot();
    assert!(state.contacts.contacts.iter().any(|c| c.id == created.id));
}

#[tokio::test]
async fn delete_conflict_is_surfaced() {
    let fake = FakeBackend::new();
    *fake.delete_conflict.lock().unwrap() = Some(ContactConflict {
        message: "Contact is a buyer of 1 vehicle".into(),
        associated_buyer_ids: vec!["c1".into()],
        associated_vehicle_ids: vec!["v9".into()],
    });
    let (controller, _) = logged_in(fake).await;

    let err = controller
        .execute(Command::DeleteContacts {
            ids: vec!["c1".into()],
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ContactConflict(_)));
    let state = controller.snapshot();
    let conflict = state.conflict.as_ref().unwrap();
    assert_eq!(conflict.associated_vehicle_ids, vec!["v9".to_owned()]);
    assert_eq!(state.contacts.contacts.len(), 2);
}

#[tokio::test]
async fn deleting_contacts_clears_selection() {
    let (controller, _) = logged_in(FakeBackend::new()).await;
    controller
        .dispatch(Intent::ToggleRow {
            table: Table::Contacts,
            id: "c1".into(),
        })
        .unwrap();

    controller
        .execute(Command::DeleteContacts {
            ids: vec!["c1".into()],
        })
        .await
        .unwrap();

    let state = controller.snapshot();
    assert!(state.selected_rows(Table::Contacts).is_empty());
    assert_eq!(*state.contacts.contacts, vec![contact("c2", "Sari")]);
    assert!(state.conflict.is_none());
}

#[tokio::test]
async fn deleting_vehicles_rebuilds_filters() {
    let (controller, _) = logged_in(FakeBackend::new()).await;
    let generation = controller.snapshot().inventory.generation;

    controller
        .execute(Command::DeleteVehicles {
            ids: vec!["v3".into()],
        })
        .await
        .unwrap();

    let state = controller.snapshot();
    assert_eq!(state.inventory.generation, generation + 1);
    let query = state.inventory.query.as_ref().unwrap();
    assert!(!query.makes_models().contains_key("Honda"));
}

#[tokio::test]
async fn unauthorized_write_ends_session() {
    let fake = FakeBackend::new();
    *fake.write_failure.lock().unwrap() = Some(Fail::Unauthorized);
    let (controller, _) = logged_in(fake).await;

    let err = controller
        .execute(Command::UpdateContact {
            id: "c1".into(),
            draft: draft("Budi Santoso", "081234567890"),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::SessionExpired));
    assert!(!controller.snapshot().is_authenticated());
}

#[tokio::test]
async fn shutdown_cancels_everything() {
    let (controller, backend) = logged_in(FakeBackend::new()).await;
    let gate = backend.hold_contact_search("sa");
    controller
        .dispatch(Intent::SetContactSearch("sa".into()))
        .unwrap();
    let request = controller.pending(Concern::ContactSearch).unwrap();

    drop(gate);
    controller.shutdown().await;

    assert!(!request.is_live());
    assert!(controller.snapshot().alerts.is_empty());
}
