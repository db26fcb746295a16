//! In-memory fakes for the store adapters, used by unit and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::meals::dto::TimeRange;
use crate::meals::repo::{MealRepository, RepoError};
use crate::meals::repo_types::Meal;
use crate::storage::StorageClient;

#[derive(Default)]
struct Tables {
    meals: HashMap<String, Meal>,
    photos: HashMap<String, String>, // photo id -> meal id
}

/// Mirrors the constraints of the real schema: unique ids and
/// `meal_photo.meal_id` restricted by `meal.id`.
#[derive(Default)]
pub struct FakeMealRepository {
    tables: Mutex<Tables>,
    fail_association_insert: AtomicBool,
}

impl FakeMealRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_meal(&self, meal: Meal) {
        self.tables.lock().unwrap().meals.insert(meal.id.clone(), meal);
    }

    pub fn meal(&self, id: &str) -> Option<Meal> {
        self.tables.lock().unwrap().meals.get(id).cloned()
    }

    pub fn meal_count(&self) -> usize {
        self.tables.lock().unwrap().meals.len()
    }

    pub fn has_association(&self, photo_id: &str) -> bool {
        self.tables.lock().unwrap().photos.contains_key(photo_id)
    }

    /// Makes every association insert fail with a generic database error.
    pub fn fail_association_insert(&self, fail: bool) {
        self.fail_association_insert.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl MealRepository for FakeMealRepository {
    async fn list_meals(&self, range: TimeRange) -> Result<Vec<Meal>, RepoError> {
        let tables = self.tables.lock().unwrap();
        let mut meals: Vec<Meal> = tables
            .meals
            .values()
            .filter(|m| range.contains(m.at))
            .cloned()
            .collect();
        meals.sort_by(|a, b| b.at.cmp(&a.at));
        Ok(meals)
    }

    async fn create_meal(&self, meal: &Meal) -> Result<Meal, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.meals.contains_key(&meal.id) {
            return Err(RepoError::Duplicate);
        }
        tables.meals.insert(meal.id.clone(), meal.clone());
        Ok(meal.clone())
    }

    async fn delete_meal(&self, id: &str) -> Result<u64, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.photos.values().any(|meal_id| meal_id == id) {
            return Err(RepoError::ForeignKey);
        }
        Ok(tables.meals.remove(id).map_or(0, |_| 1))
    }

    async fn create_association(&self, photo_id: &str, meal_id: &str) -> Result<(), RepoError> {
        if self.fail_association_insert.load(Ordering::SeqCst) {
            return Err(RepoError::Database(sqlx::Error::PoolTimedOut));
        }
        let mut tables = self.tables.lock().unwrap();
        if tables.photos.contains_key(photo_id) {
            return Err(RepoError::Duplicate);
        }
        if !tables.meals.contains_key(meal_id) {
            return Err(RepoError::ForeignKey);
        }
        tables.photos.insert(photo_id.to_string(), meal_id.to_string());
        Ok(())
    }

    async fn delete_association(&self, photo_id: &str) -> Result<u64, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.photos.remove(photo_id).map_or(0, |_| 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageCall {
    Put(String),
    Delete(String),
}

/// Object store fake with failure injection and a call log.
#[derive(Default)]
pub struct FakeStorage {
    objects: Mutex<HashMap<String, (Bytes, Option<String>)>>,
    calls: Mutex<Vec<StorageCall>>,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_put(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    pub fn fail_delete(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).map(|(b, _)| b.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.lock().unwrap().get(key).and_then(|(_, ct)| ct.clone())
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageClient for FakeStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: Option<&str>,
    ) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(StorageCall::Put(key.to_string()));
        if self.fail_put.load(Ordering::SeqCst) {
            anyhow::bail!("fake put_object failure");
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.map(str::to_string)));
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(StorageCall::Delete(key.to_string()));
        if self.fail_delete.load(Ordering::SeqCst) {
            anyhow::bail!("fake delete_object failure");
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
