//! In-process entity store.
//!
//! All tables sit behind one `RwLock`, so every conditional update and the
//! swap commit observe and mutate a consistent snapshot.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use rota_shared::types::{LeaveRequestId, ShiftId, SwapRequestId, UserId};

use super::{
    LeaveFilter, LeavePatch, LeaveStore, ShiftFilter, ShiftStore, StoreError, StoreResult,
    SwapApproval, SwapPatch, SwapStore, UserFilter, UserStore,
};
use crate::access::EntityKind;
use crate::model::{LeaveRequest, Shift, SwapRequest, User};
use crate::workflow::{LeaveStatus, SwapStatus};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    shifts: BTreeMap<ShiftId, Shift>,
    leaves: BTreeMap<LeaveRequestId, LeaveRequest>,
    swaps: BTreeMap<SwapRequestId, SwapRequest>,
}

/// Entity store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: User) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ShiftStore for InMemoryStore {
    async fn insert_shift(&self, shift: Shift) -> StoreResult<Shift> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&shift.assigned_to) {
            return Err(StoreError::NotFound {
                entity: EntityKind::User,
                id: shift.assigned_to.into_inner(),
            });
        }
        tables.shifts.insert(shift.id, shift.clone());
        Ok(shift)
    }

    async fn find_shift(&self, id: ShiftId) -> StoreResult<Option<Shift>> {
        Ok(self.tables.read().await.shifts.get(&id).cloned())
    }

    async fn find_shifts(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let tables = self.tables.read().await;
        Ok(tables
            .shifts
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LeaveStore for InMemoryStore {
    async fn insert_leave(&self, leave: LeaveRequest) -> StoreResult<LeaveRequest> {
        let mut tables = self.tables.write().await;
        tables.leaves.insert(leave.id, leave.clone());
        Ok(leave)
    }

    async fn find_leave(&self, id: LeaveRequestId) -> StoreResult<Option<LeaveRequest>> {
        Ok(self.tables.read().await.leaves.get(&id).cloned())
    }

    async fn find_leaves(&self, filter: &LeaveFilter) -> StoreResult<Vec<LeaveRequest>> {
        let tables = self.tables.read().await;
        Ok(tables
            .leaves
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect())
    }

    async fn update_leave_if_status(
        &self,
        id: LeaveRequestId,
        expected: LeaveStatus,
        patch: &LeavePatch,
    ) -> StoreResult<LeaveRequest> {
        let mut tables = self.tables.write().await;
        let leave = tables.leaves.get_mut(&id).ok_or(StoreError::NotFound {
            entity: EntityKind::Leave,
            id: id.into_inner(),
        })?;
        if leave.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: EntityKind::Leave,
                id: id.into_inner(),
                expected: expected.as_str(),
                actual: leave.status.to_string(),
            });
        }
        patch.apply_to(leave);
        Ok(leave.clone())
    }
}

#[async_trait]
impl SwapStore for InMemoryStore {
    async fn insert_swap(&self, swap: SwapRequest) -> StoreResult<SwapRequest> {
        let mut tables = self.tables.write().await;
        tables.swaps.insert(swap.id, swap.clone());
        Ok(swap)
    }

    async fn find_swap(&self, id: SwapRequestId) -> StoreResult<Option<SwapRequest>> {
        Ok(self.tables.read().await.swaps.get(&id).cloned())
    }

    async fn find_swaps(&self) -> StoreResult<Vec<SwapRequest>> {
        Ok(self.tables.read().await.swaps.values().cloned().collect())
    }

    async fn update_swap_if_status(
        &self,
        id: SwapRequestId,
        expected: SwapStatus,
        patch: &SwapPatch,
    ) -> StoreResult<SwapRequest> {
        let mut tables = self.tables.write().await;
        let swap = tables.swaps.get_mut(&id).ok_or(StoreError::NotFound {
            entity: EntityKind::Swap,
            id: id.into_inner(),
        })?;
        if swap.status != expected {
            return Err(StoreError::StatusMismatch {
                entity: EntityKind::Swap,
                id: id.into_inner(),
                expected: expected.as_str(),
                actual: swap.status.to_string(),
            });
        }
        patch.apply_to(swap);
        Ok(swap.clone())
    }

    async fn commit_swap_approval(&self, approval: &SwapApproval) -> StoreResult<SwapRequest> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        // Check everything before touching anything.
        let swap = tables
            .swaps
            .get(&approval.swap_id)
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Swap,
                id: approval.swap_id.into_inner(),
            })?;
        if swap.status != SwapStatus::PendingManager {
            return Err(StoreError::StatusMismatch {
                entity: EntityKind::Swap,
                id: approval.swap_id.into_inner(),
                expected: SwapStatus::PendingManager.as_str(),
                actual: swap.status.to_string(),
            });
        }
        let moves = approval.moves();
        for m in &moves {
            let shift = tables.shifts.get(&m.shift_id).ok_or(StoreError::NotFound {
                entity: EntityKind::Shift,
                id: m.shift_id.into_inner(),
            })?;
            if shift.assigned_to != m.from {
                return Err(StoreError::OwnershipChanged {
                    shift_id: m.shift_id.into_inner(),
                });
            }
        }

        for m in &moves {
            if let Some(shift) = tables.shifts.get_mut(&m.shift_id) {
                shift.assigned_to = m.to;
                shift.updated_at = approval.approved_at;
            }
        }
        let swap = tables
            .swaps
            .get_mut(&approval.swap_id)
            .ok_or(StoreError::NotFound {
                entity: EntityKind::Swap,
                id: approval.swap_id.into_inner(),
            })?;
        swap.status = SwapStatus::Approved;
        swap.manager_approver = Some(approval.approved_by);
        swap.updated_at = approval.approved_at;
        Ok(swap.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use chrono::{NaiveDate, Utc};

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: email.to_string(),
            email: email.to_string(),
            role: Role::Employee,
            created_at: Utc::now(),
        }
    }

    fn shift(holder: UserId, day: u32) -> Shift {
        let now = Utc::now();
        Shift {
            id: ShiftId::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            assigned_to: holder,
            created_at: now,
            updated_at: now,
        }
    }

    fn swap(a: &Shift, b: &Shift, status: SwapStatus) -> SwapRequest {
        let now = Utc::now();
        SwapRequest {
            id: SwapRequestId::new(),
            initiator: a.assigned_to,
            target: b.assigned_to,
            initiator_shift: a.id,
            target_shift: b.id,
            status,
            manager_approver: None,
            rejected_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded() -> (InMemoryStore, Shift, Shift) {
        let store = InMemoryStore::new();
        let alice = store.insert_user(user("alice@example.com")).await.unwrap();
        let bob = store.insert_user(user("bob@example.com")).await.unwrap();
        let a = store.insert_shift(shift(alice.id, 3)).await.unwrap();
        let b = store.insert_shift(shift(bob.id, 4)).await.unwrap();
        (store, a, b)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        store.insert_user(user("a@example.com")).await.unwrap();
        let err = store.insert_user(user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_shift_for_unknown_user_rejected() {
        let store = InMemoryStore::new();
        let err = store.insert_shift(shift(UserId::new(), 1)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: EntityKind::User,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_conditional_update_checks_status() {
        let (store, a, b) = seeded().await;
        let pending = store
            .insert_swap(swap(&a, &b, SwapStatus::PendingPeer))
            .await
            .unwrap();
        let patch = SwapPatch {
            status: SwapStatus::PendingManager,
            rejected_by: None,
            updated_at: Utc::now(),
        };

        let updated = store
            .update_swap_if_status(pending.id, SwapStatus::PendingPeer, &patch)
            .await
            .unwrap();
        assert_eq!(updated.status, SwapStatus::PendingManager);

        let err = store
            .update_swap_if_status(pending.id, SwapStatus::PendingPeer, &patch)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusMismatch { ref actual, .. } if actual == "PENDING_MANAGER"
        ));
    }

    #[tokio::test]
    async fn test_commit_swap_exchanges_shifts() {
        let (store, a, b) = seeded().await;
        let pending = store
            .insert_swap(swap(&a, &b, SwapStatus::PendingManager))
            .await
            .unwrap();
        let manager = UserId::new();

        let approved = store
            .commit_swap_approval(&SwapApproval::for_swap(&pending, manager, Utc::now()))
            .await
            .unwrap();

        assert_eq!(approved.status, SwapStatus::Approved);
        assert_eq!(approved.manager_approver, Some(manager));
        let a_after = store.find_shift(a.id).await.unwrap().unwrap();
        let b_after = store.find_shift(b.id).await.unwrap().unwrap();
        assert_eq!(a_after.assigned_to, b.assigned_to);
        assert_eq!(b_after.assigned_to, a.assigned_to);
    }

    #[tokio::test]
    async fn test_commit_swap_is_all_or_nothing() {
        let (store, a, b) = seeded().await;
        let pending = store
            .insert_swap(swap(&a, &b, SwapStatus::PendingManager))
            .await
            .unwrap();

        // Someone else now holds the target shift.
        let carol = store.insert_user(user("carol@example.com")).await.unwrap();
        store.tables.write().await.shifts.get_mut(&b.id).unwrap().assigned_to = carol.id;

        let err = store
            .commit_swap_approval(&SwapApproval::for_swap(&pending, UserId::new(), Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::OwnershipChanged { .. }));

        let swap_after = store.find_swap(pending.id).await.unwrap().unwrap();
        assert_eq!(swap_after.status, SwapStatus::PendingManager);
        let a_after = store.find_shift(a.id).await.unwrap().unwrap();
        assert_eq!(a_after.assigned_to, a.assigned_to);
    }

    #[tokio::test]
    async fn test_commit_swap_requires_pending_manager() {
        let (store, a, b) = seeded().await;
        let pending = store
            .insert_swap(swap(&a, &b, SwapStatus::PendingPeer))
            .await
            .unwrap();
        let err = store
            .commit_swap_approval(&SwapApproval::for_swap(&pending, UserId::new(), Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StatusMismatch { .. }));
    }

    #[tokio::test]
    async fn test_leave_filters() {
        let store = InMemoryStore::new();
        let owner = UserId::new();
        let now = Utc::now();
        for (user, status) in [
            (owner, LeaveStatus::Pending),
            (owner, LeaveStatus::Approved),
            (UserId::new(), LeaveStatus::Pending),
        ] {
            store
                .insert_leave(LeaveRequest {
                    id: LeaveRequestId::new(),
                    user,
                    start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                    end_date: NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
                    reason: "rest".to_string(),
                    status,
                    team_lead_approver: None,
                    manager_approver: None,
                    rejected_by: None,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }

        let all = store.find_leaves(&LeaveFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        let own = LeaveFilter { user: Some(owner) };
        assert_eq!(store.find_leaves(&own).await.unwrap().len(), 2);
    }
}
