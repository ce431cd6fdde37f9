//! Model-checking harness.
//!
//! Applies operations to a real store and to an in-memory model side by
//! side, then compares them.

use std::collections::BTreeMap;

use userdb_codec::{Decode, Encode};
use userdb_core::User;

use crate::fixtures::TestStore;
use crate::generators::UserOperation;

/// A store paired with the expected contents.
pub struct ModelHarness {
    /// The store under test.
    pub store: TestStore,
    model: BTreeMap<u64, String>,
    last_id: u64,
}

impl ModelHarness {
    /// Creates a harness over a fresh temporary store.
    pub fn new() -> Self {
        Self {
            store: TestStore::new(),
            model: BTreeMap::new(),
            last_id: 0,
        }
    }

    fn live_id(&self, nth: usize) -> Option<u64> {
        if self.model.is_empty() {
            return None;
        }
        self.model.keys().nth(nth % self.model.len()).copied()
    }

    /// Applies one operation to both sides, asserting on its result.
    pub fn apply(&mut self, op: &UserOperation) {
        match op {
            UserOperation::Create { username } => {
                let mut user = User::new(username.clone());
                let id = self.store.create_user(&mut user).expect("Failed to create user");
                assert_eq!(id, self.last_id + 1, "ids must be strictly increasing");
                assert_eq!(user.id, id);
                self.last_id = id;
                self.model.insert(id, username.clone());
            }
            UserOperation::Rename { nth, username } => match self.live_id(*nth) {
                Some(id) => {
                    self.store
                        .set_username(id, username.clone())
                        .expect("Failed to rename user");
                    self.model.insert(id, username.clone());
                }
                None => {
                    let err = self.store.set_username(self.last_id + 1, username.clone());
                    assert!(err.expect_err("rename of missing user").is_not_found());
                }
            },
            UserOperation::Delete { nth } => {
                if let Some(id) = self.live_id(*nth) {
                    self.store.delete_user(id).expect("Failed to delete user");
                    self.model.remove(&id);
                }
            }
            UserOperation::DeleteMissing => {
                self.store
                    .delete_user(self.last_id + 1)
                    .expect("Deleting a missing id must succeed");
            }
            UserOperation::Get { nth } => {
                if let Some(id) = self.live_id(*nth) {
                    let user = self.store.user(id).expect("Failed to get user");
                    assert_eq!(user.map(|u| u.username).as_ref(), self.model.get(&id));
                }
            }
        }
    }

    /// Checks that the store lists exactly the model, in id order.
    pub fn verify_all(&self) {
        let actual: Vec<(u64, String)> = self
            .store
            .users()
            .expect("Failed to list users")
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();
        let expected: Vec<(u64, String)> =
            self.model.iter().map(|(id, name)| (*id, name.clone())).collect();
        assert_eq!(actual, expected);
        assert_eq!(
            self.store.count_users().expect("Failed to count users"),
            self.model.len() as u64
        );
    }

    /// Closes and reopens the store, keeping the model.
    pub fn reopen(&mut self) {
        self.store.reopen();
    }

    /// Number of users the model expects.
    pub fn tracked_count(&self) -> usize {
        self.model.len()
    }
}

impl Default for ModelHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross-crate checks.
pub mod cross_crate {
    use super::*;

    /// Stores `user` and checks the stored bytes decode to the same value.
    pub fn test_encode_store_retrieve(store: &TestStore, user: &User) {
        let mut created = user.clone();
        let id = store.create_user(&mut created).expect("Failed to create user");

        let fetched = store.user(id).expect("Failed to get user").expect("User missing");
        assert_eq!(fetched, created);

        let bytes = fetched.encode().expect("Failed to encode user");
        assert_eq!(User::decode(&bytes).expect("Failed to decode user"), created);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_tracks_operations() {
        let mut harness = ModelHarness::new();
        harness.apply(&UserOperation::Create {
            username: "susy".into(),
        });
        harness.apply(&UserOperation::Create {
            username: "john".into(),
        });
        harness.apply(&UserOperation::Rename {
            nth: 1,
            username: "jimbo".into(),
        });
        harness.apply(&UserOperation::Delete { nth: 0 });
        harness.apply(&UserOperation::DeleteMissing);
        harness.verify_all();
        assert_eq!(harness.tracked_count(), 1);
    }

    #[test]
    fn test_cross_crate_roundtrip() {
        let store = TestStore::new();
        cross_crate::test_encode_store_retrieve(&store, &User::new("susy"));
    }
}
