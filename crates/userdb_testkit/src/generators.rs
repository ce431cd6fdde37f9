//! Property-based test generators using proptest.
//!
//! Provides strategies for users and operation sequences that stay within
//! the store's accepted limits.

use proptest::prelude::*;
use userdb_core::{User, MAX_USERNAME_LEN};

/// Strategy for usernames the store accepts, including non-ASCII text.
pub fn username_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => prop::string::string_regex("[a-z][a-z0-9_]{0,15}").expect("Invalid regex"),
        1 => any::<String>(),
    ]
    .prop_filter("Username must fit the length limit", |s| {
        s.len() <= MAX_USERNAME_LEN
    })
}

/// Strategy for usernames one or more bytes over the limit.
pub fn oversized_username_strategy() -> impl Strategy<Value = String> {
    (MAX_USERNAME_LEN + 1..MAX_USERNAME_LEN * 2).prop_map(|len| "x".repeat(len))
}

/// Strategy for users with arbitrary ids in the encodable range.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (0..=i64::MAX as u64, username_strategy()).prop_map(|(id, username)| User { id, username })
}

/// A store operation for model-based tests.
#[derive(Debug, Clone)]
pub enum UserOperation {
    /// Create a user
    Create {
        /// Username
        username: String,
    },
    /// Rename the `nth` live user (modulo the live count)
    Rename {
        /// Index into the live ids
        nth: usize,
        /// New username
        username: String,
    },
    /// Delete the `nth` live user (modulo the live count)
    Delete {
        /// Index into the live ids
        nth: usize,
    },
    /// Delete an id that was never assigned
    DeleteMissing,
    /// Get the `nth` live user (modulo the live count)
    Get {
        /// Index into the live ids
        nth: usize,
    },
}

/// Strategy for generating user operations.
pub fn user_operation_strategy() -> impl Strategy<Value = UserOperation> {
    prop_oneof![
        4 => username_strategy().prop_map(|username| UserOperation::Create { username }),
        2 => (any::<usize>(), username_strategy())
            .prop_map(|(nth, username)| UserOperation::Rename { nth, username }),
        1 => any::<usize>().prop_map(|nth| UserOperation::Delete { nth }),
        1 => Just(UserOperation::DeleteMissing),
        2 => any::<usize>().prop_map(|nth| UserOperation::Get { nth }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<UserOperation>> {
    prop::collection::vec(user_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Configuration for tests that touch the filesystem on every case.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn username_fits_limit(name in username_strategy()) {
            prop_assert!(name.len() <= MAX_USERNAME_LEN);
        }

        #[test]
        fn oversized_username_exceeds_limit(name in oversized_username_strategy()) {
            prop_assert!(name.len() > MAX_USERNAME_LEN);
        }

        #[test]
        fn user_id_is_encodable(user in user_strategy()) {
            prop_assert!(i64::try_from(user.id).is_ok());
        }
    }
}
