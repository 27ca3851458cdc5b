//! Resource services: one module per backend resource.
//!
//! Each function builds a path, optionally a body, makes exactly one gateway
//! call and returns its envelope unmodified.

pub mod auth;
pub mod exercises;
pub mod meal_demos;
pub mod plans;
pub mod policies;
pub mod reviews;
pub mod users;

use crate::gateway::Gateway;

/// Every resource service over one shared gateway.
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub users: users::UsersService,
    pub plans: plans::PlansService,
    pub exercises: exercises::ExercisesService,
    pub meal_demos: meal_demos::MealDemosService,
    pub policies: policies::PoliciesService,
    pub reviews: reviews::ReviewsService,
}

impl Services {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            auth: auth::AuthService::new(gateway.clone()),
            users: users::UsersService::new(gateway.clone()),
            plans: plans::PlansService::new(gateway.clone()),
            exercises: exercises::ExercisesService::new(gateway.clone()),
            meal_demos: meal_demos::MealDemosService::new(gateway.clone()),
            policies: policies::PoliciesService::new(gateway.clone()),
            reviews: reviews::ReviewsService::new(gateway),
        }
    }
}
