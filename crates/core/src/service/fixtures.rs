//! Shared setup for service tests.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use rota_shared::types::{ShiftId, UserId};

use super::Services;
use crate::access::{Principal, Role};
use crate::model::{Shift, User};
use crate::notify::{NotificationSink, TracingSink};
use crate::store::{EntityStore, InMemoryStore, ShiftStore, UserStore};

/// In-memory store seeded with two employees, a team lead and a manager.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub services: Services,
    pub alice: Principal,
    pub bob: Principal,
    pub lead: Principal,
    pub manager: Principal,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink)).await
    }

    pub async fn with_sink(sink: Arc<dyn NotificationSink>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let alice = seed_user(&store, "alice", Role::Employee).await;
        let bob = seed_user(&store, "bob", Role::Employee).await;
        let lead = seed_user(&store, "lee", Role::TeamLead).await;
        let manager = seed_user(&store, "mona", Role::Manager).await;

        let dyn_store: Arc<dyn EntityStore> = store.clone();
        Self {
            services: Services::new(dyn_store, sink),
            store,
            alice,
            bob,
            lead,
            manager,
        }
    }

    /// Puts a shift on `day` of March 2025 directly into the store.
    pub async fn shift(&self, holder: UserId, day: u32) -> ShiftId {
        let now = Utc::now();
        let shift = Shift {
            id: ShiftId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            assigned_to: holder,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_shift(shift).await.unwrap().id
    }

    pub async fn holder_of(&self, shift: ShiftId) -> UserId {
        self.store.find_shift(shift).await.unwrap().unwrap().assigned_to
    }
}

async fn seed_user(store: &InMemoryStore, name: &str, role: Role) -> Principal {
    let user = User {
        id: UserId::new(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        role,
        created_at: Utc::now(),
    };
    let user = store.insert_user(user).await.unwrap();
    Principal::new(user.id, user.role)
}
