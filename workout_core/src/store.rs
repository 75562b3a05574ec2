//! Plan store: built-in plans plus user-imported plans kept in storage.
//!
//! Imported plans live under a single storage key as a JSON array. Every
//! mutation rewrites the whole array while holding the storage's
//! exclusive access to that key. Unreadable or malformed stored content is
//! logged and treated as "no custom plans".

use crate::catalog::{builtin_plan, builtin_plans, is_builtin};
use crate::schema::validate_plan;
use crate::storage::Storage;
use crate::{Error, Plan, Result};
use uuid::Uuid;

/// Storage key holding the imported plans
pub const CUSTOM_PLANS_KEY: &str = "customWorkouts";

pub struct PlanStore<S: Storage> {
    storage: S,
}

impl<S: Storage> PlanStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Built-in plans first, then imported plans in storage order
    pub fn list_all(&self) -> Vec<Plan> {
        let mut plans = builtin_plans().to_vec();
        plans.extend(self.load_custom());
        plans
    }

    /// Imported plans only
    pub fn list_custom(&self) -> Vec<Plan> {
        self.load_custom()
    }

    /// First plan with this id; built-ins shadow imports
    pub fn get_by_id(&self, id: &str) -> Option<Plan> {
        if let Some(plan) = builtin_plan(id) {
            return Some(plan.clone());
        }
        self.load_custom().into_iter().find(|p| p.id == id)
    }

    /// Like [`get_by_id`](Self::get_by_id) but missing plans are an error
    pub fn require(&self, id: &str) -> Result<Plan> {
        self.get_by_id(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Validate and append a plan to the imported set.
    ///
    /// An id already taken by another plan is replaced with a unique one;
    /// the stored plan (with its final id) is returned.
    pub fn add(&mut self, mut plan: Plan) -> Result<Plan> {
        validate_plan(&plan)?;

        let plan = self.storage.exclusive(CUSTOM_PLANS_KEY, |storage| {
            let mut custom = read_custom(storage);

            if is_builtin(&plan.id) || custom.iter().any(|p| p.id == plan.id) {
                let original = plan.id.clone();
                plan.id = unique_id(&original, &custom);
                tracing::warn!(
                    "Workout id '{}' already exists, storing as '{}'",
                    original,
                    plan.id
                );
            }

            custom.push(plan.clone());
            write_custom(storage, &custom)?;
            Ok(plan)
        })?;

        tracing::info!("Saved workout '{}' ({})", plan.title, plan.id);
        Ok(plan)
    }

    /// Remove an imported plan. Built-in plans cannot be deleted.
    pub fn delete_by_id(&mut self, id: &str) -> Result<()> {
        if is_builtin(id) {
            return Err(Error::Precondition(
                "Cannot delete default workouts".to_string(),
            ));
        }

        self.storage.exclusive(CUSTOM_PLANS_KEY, |storage| {
            let mut custom = read_custom(storage);
            let before = custom.len();
            custom.retain(|p| p.id != id);

            if custom.len() == before {
                return Err(Error::NotFound(id.to_string()));
            }

            write_custom(storage, &custom)
        })?;

        tracing::info!("Deleted workout '{}'", id);
        Ok(())
    }

    fn load_custom(&self) -> Vec<Plan> {
        read_custom(&self.storage)
    }
}

fn read_custom<S: Storage>(storage: &S) -> Vec<Plan> {
    let raw = match storage.get(CUSTOM_PLANS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!("Unable to read custom workouts: {}. Using none.", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Plan>>(&raw) {
        Ok(plans) => plans,
        Err(e) => {
            tracing::warn!("Failed to parse custom workouts: {}. Using none.", e);
            Vec::new()
        }
    }
}

fn write_custom<S: Storage>(storage: &mut S, custom: &[Plan]) -> Result<()> {
    let contents = serde_json::to_string(custom)?;
    storage.set(CUSTOM_PLANS_KEY, &contents)
}

fn unique_id(base: &str, custom: &[Plan]) -> String {
    loop {
        let suffix = Uuid::new_v4().simple().to_string();
        let candidate = format!("{}-{}", base, &suffix[..8]);
        if !is_builtin(&candidate) && custom.iter().all(|p| p.id != candidate) {
            return candidate;
        }
    }
}
