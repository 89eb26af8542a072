//! 内存账户存储
//! In-memory account store
//!
//! 进程内的默认实现，也是测试使用的实现。一把读写锁保护整张表，
//! 请求处理都是短临界区。
//! Default in-process backend, also the one the tests run against. A
//! single RwLock guards the table; every critical section is short.

use super::{StoreError, UserStore};
use crate::modules::user::models::{NewUser, User, UserChanges};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

pub struct MemoryUserStore {
    users: RwLock<BTreeMap<i64, User>>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // 唯一性检查和插入在同一个写锁临界区内
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = chrono::Utc::now().naive_utc();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            email: new_user.email,
            name: new_user.name,
            password_hash: new_user.password_hash,
            is_active: new_user.is_active,
            is_staff: new_user.is_staff,
            is_superuser: new_user.is_superuser,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let user = users.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(is_staff) = changes.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(is_superuser) = changes.is_superuser {
            user.is_superuser = is_superuser;
        }
        user.updated_at = chrono::Utc::now().naive_utc();

        Ok(user.clone())
    }

    async fn list(&self, search: Option<&str>) -> Result<Vec<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|e| StoreError::Database(e.to_string()))?;

        // BTreeMap 迭代本身就是 id 升序
        let result = match search {
            Some(term) => {
                let term = term.to_lowercase();
                users
                    .values()
                    .filter(|u| {
                        u.name.to_lowercase().contains(&term)
                            || u.email.to_lowercase().contains(&term)
                    })
                    .cloned()
                    .collect()
            }
            None => users.values().cloned().collect(),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash: "$argon2id$fake".to_string(),
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryUserStore::new();

        let a = store.insert(new_user("a@example.com", "A")).await.unwrap();
        let b = store.insert(new_user("b@example.com", "B")).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(store.find_by_id(a.id).await.unwrap().unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_without_side_effects() {
        let store = MemoryUserStore::new();
        store
            .insert(new_user("test@example.com", "First"))
            .await
            .unwrap();

        let err = store
            .insert(new_user("test@example.com", "Second"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        // 第二次插入没有留下任何痕迹
        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "First");
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = MemoryUserStore::new();

        let err = store.update(42, UserChanges::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_given_fields() {
        let store = MemoryUserStore::new();
        let user = store
            .insert(new_user("test@example.com", "Old Name"))
            .await
            .unwrap();

        let updated = store
            .update(
                user.id,
                UserChanges {
                    name: Some("New Name".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.email, "test@example.com");
        assert_eq!(updated.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_list_search_matches_name_and_email_case_insensitively() {
        let store = MemoryUserStore::new();
        store
            .insert(new_user("alice@example.com", "Alice"))
            .await
            .unwrap();
        store
            .insert(new_user("bob@example.com", "Bob"))
            .await
            .unwrap();

        let by_name = store.list(Some("ALICE")).await.unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].email, "alice@example.com");

        let by_email = store.list(Some("bob@")).await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Bob");

        let all = store.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
