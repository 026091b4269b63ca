use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use tessera_server::models::{Event, NewTicketType, TicketCategory, User, UserRole};
use tessera_server::services::{BookingService, CapacityLedger, TicketRegistry};
use tessera_server::store::memory::InMemoryStore;
use tessera_server::store::EventStore;

/// The three core services wired over one in-memory store, plus direct
/// access to the store for seeding collaborator-owned rows (users, events).
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub ledger: CapacityLedger,
    pub registry: TicketRegistry,
    pub bookings: BookingService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let port: Arc<dyn EventStore> = store.clone();
        Self {
            ledger: CapacityLedger::new(port.clone()),
            registry: TicketRegistry::new(port.clone()),
            bookings: BookingService::new(port),
            store,
        }
    }

    pub async fn seed_user(&self, role: UserRole) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: format!("{}@example.com", Uuid::new_v4()),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.store.put_user(user.clone()).await;
        user
    }

    pub async fn seed_event(&self, created_by: Uuid, capacity: i32) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            created_by,
            title: "Launch Party".to_string(),
            description: None,
            location: "Main Hall".to_string(),
            category: "Music".to_string(),
            capacity,
            start_time: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.store.put_event(event.clone()).await;
        event
    }
}

pub fn regular(price: Decimal, limit: i32) -> NewTicketType {
    NewTicketType {
        category: TicketCategory::Regular,
        price,
        limit,
        dynamic_pricing_rules: None,
    }
}
