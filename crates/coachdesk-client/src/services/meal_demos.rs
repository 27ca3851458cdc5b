//! Meal demos (`fitness/api/mealdemo`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::{ApiRequest, MultipartBody};
use crate::types::{FileUpload, PageParams, ResourceId};

const MEAL_DEMO_PATH: &str = "fitness/api/mealdemo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDemo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub calories: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealDemoUpload {
    pub title: String,
    pub calories: Option<u32>,
    pub image: Option<FileUpload>,
    pub ingredients: Vec<Ingredient>,
}

impl MealDemoUpload {
    pub fn to_multipart(&self) -> MultipartBody {
        let mut form = MultipartBody::new()
            .text("title", &self.title)
            .text_opt("calories", self.calories)
            .indexed("ingredients", &self.ingredients);

        if let Some(image) = &self.image {
            form = form.file(
                "image",
                image.bytes.clone(),
                image.file_name.clone(),
                image.mime.clone(),
            );
        }
        form
    }
}

#[derive(Debug, Clone)]
pub struct MealDemosService {
    gateway: Gateway,
}

impl MealDemosService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, page: &PageParams) -> Envelope<Vec<MealDemo>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, MEAL_DEMO_PATH).query_struct(page))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<MealDemo> {
        self.gateway
            .send(ApiRequest::get(
                ServiceKind::Fitness,
                format!("{}/{}", MEAL_DEMO_PATH, id.path_segment()),
            ))
            .await
    }

    pub async fn create(&self, upload: &MealDemoUpload) -> Envelope<MealDemo> {
        self.gateway
            .send(
                ApiRequest::post(ServiceKind::Fitness, MEAL_DEMO_PATH)
                    .multipart(upload.to_multipart()),
            )
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        self.gateway
            .send(ApiRequest::delete(
                ServiceKind::Fitness,
                format!("{}/{}", MEAL_DEMO_PATH, id.path_segment()),
            ))
            .await
    }
}
