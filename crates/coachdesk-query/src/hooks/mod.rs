//! Per-resource query and mutation hooks.
//!
//! Each module names its cache keys, picks staleness windows and registers
//! its invalidation edges. Reads go through the shared [`QueryClient`];
//! writes go through [`QueryClient::mutate`] so dependent keys refetch.

pub mod exercises;
pub mod meal_demos;
pub mod plans;
pub mod policies;
pub mod reviews;
pub mod users;

use std::time::Duration;

use coachdesk_client::{ClientError, Envelope, ResourceId, Services};

use crate::client::QueryClient;
use crate::invalidation::{InvalidationTable, KeyPattern};
use crate::key::QueryKey;
use crate::options::QueryOptions;

pub const LIST_STALE_TIME: Duration = Duration::from_secs(30);
pub const DETAIL_STALE_TIME: Duration = Duration::from_secs(60);
pub const POLICY_STALE_TIME: Duration = Duration::from_secs(5 * 60);

pub(crate) const LIST: &str = "list";
pub(crate) const DETAIL: &str = "detail";

/// Invalidation edges for every resource.
pub fn invalidation_table() -> InvalidationTable {
    let mut table = InvalidationTable::new();
    users::register(&mut table);
    plans::register(&mut table);
    exercises::register(&mut table);
    meal_demos::register(&mut table);
    policies::register(&mut table);
    reviews::register(&mut table);
    table
}

/// Every hook over one registry.
#[derive(Debug, Clone)]
pub struct Hooks {
    pub client: QueryClient,
    pub users: users::UserQueries,
    pub plans: plans::PlanQueries,
    pub exercises: exercises::ExerciseQueries,
    pub meal_demos: meal_demos::MealDemoQueries,
    pub policies: policies::PolicyQueries,
    pub reviews: reviews::ReviewQueries,
}

impl Hooks {
    /// Hooks over a fresh registry using [`invalidation_table`].
    pub fn new(services: Services) -> Self {
        Self::with_client(QueryClient::with_table(invalidation_table()), services)
    }

    pub fn with_client(client: QueryClient, services: Services) -> Self {
        Self {
            users: users::UserQueries::new(client.clone(), services.users),
            plans: plans::PlanQueries::new(client.clone(), services.plans),
            exercises: exercises::ExerciseQueries::new(client.clone(), services.exercises),
            meal_demos: meal_demos::MealDemoQueries::new(client.clone(), services.meal_demos),
            policies: policies::PolicyQueries::new(client.clone(), services.policies),
            reviews: reviews::ReviewQueries::new(client.clone(), services.reviews),
            client,
        }
    }
}

/// List prefix plus per-item detail for `domain`.
pub(crate) fn register_list_and_detail(table: &mut InvalidationTable, domain: &'static str) {
    table.add_edge(domain, KeyPattern::prefix([domain, LIST]));
    table.add_edge(domain, KeyPattern::detail(domain, DETAIL));
}

pub(crate) fn list_key<P: serde::Serialize>(domain: &str, params: &P) -> QueryKey {
    QueryKey::new([domain, LIST]).with_params(params)
}

/// `[domain, detail, id]`, or the bare `[domain, detail]` prefix when the id
/// is not known yet.
pub(crate) fn detail_key(domain: &str, id: Option<&ResourceId>) -> QueryKey {
    let key = QueryKey::new([domain, DETAIL]);
    match id {
        Some(id) => key.with_id(id),
        None => key,
    }
}

/// Detail queries run only once their identifier is known.
pub(crate) fn detail_options(stale_time: Duration, id: Option<&ResourceId>) -> QueryOptions {
    QueryOptions::stale_for(stale_time).enabled(id.is_some())
}

pub(crate) fn missing_id<T>(resource: &'static str) -> Envelope<T> {
    Envelope::failure(ClientError::MissingIdentifier { resource }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_resource_has_edges() {
        let table = invalidation_table();
        for domain in [
            users::DOMAIN,
            plans::DOMAIN,
            exercises::DOMAIN,
            meal_demos::DOMAIN,
            policies::DOMAIN,
            reviews::DOMAIN,
        ] {
            assert!(
                table.patterns(domain).len() >= 2,
                "{} has no list/detail edges",
                domain
            );
        }
    }

    #[test]
    fn test_plan_changes_touch_reviews() {
        let keys = invalidation_table().resolve(plans::DOMAIN, None);
        assert!(keys.contains(&QueryKey::new([reviews::DOMAIN, LIST])));
    }

    #[test]
    fn test_detail_key_without_id_is_prefix() {
        let id = ResourceId::new("user", "u-1").unwrap();
        let full = detail_key("users", Some(&id));
        assert!(full.starts_with(&detail_key("users", None)));
    }
}
