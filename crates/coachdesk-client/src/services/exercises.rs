//! Exercise library on the fitness service.
//!
//! Create and update carry a demo video, so they go out as multipart forms
//! with the steps encoded as `steps[i].field` parts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ServiceKind;
use crate::envelope::Envelope;
use crate::gateway::Gateway;
use crate::request::{ApiRequest, MultipartBody};
use crate::types::{FileUpload, ResourceId};

const EXERCISES_PATH: &str = "fitness/api/exercises";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub steps: Vec<ExerciseStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStep {
    pub order: u32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Multipart payload for create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseUpload {
    pub name: String,
    pub muscle_group: Option<String>,
    pub difficulty: Option<String>,
    pub description: Option<String>,
    pub video: Option<FileUpload>,
    pub steps: Vec<ExerciseStep>,
}

impl ExerciseUpload {
    pub fn to_multipart(&self) -> MultipartBody {
        let mut form = MultipartBody::new()
            .text("name", &self.name)
            .text_opt("muscleGroup", self.muscle_group.as_ref())
            .text_opt("difficulty", self.difficulty.as_ref())
            .text_opt("description", self.description.as_ref())
            .indexed("steps", &self.steps);

        if let Some(video) = &self.video {
            form = form.file(
                "video",
                video.bytes.clone(),
                video.file_name.clone(),
                video.mime.clone(),
            );
        }
        form
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ExercisesService {
    gateway: Gateway,
}

impl ExercisesService {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, params: &ExerciseListParams) -> Envelope<Vec<Exercise>> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, EXERCISES_PATH).query_struct(params))
            .await
    }

    pub async fn get(&self, id: &ResourceId) -> Envelope<Exercise> {
        self.gateway
            .send(ApiRequest::get(ServiceKind::Fitness, exercise_path(id)))
            .await
    }

    pub async fn create(&self, upload: &ExerciseUpload) -> Envelope<Exercise> {
        self.gateway
            .send(
                ApiRequest::post(ServiceKind::Fitness, EXERCISES_PATH)
                    .multipart(upload.to_multipart()),
            )
            .await
    }

    pub async fn update(&self, id: &ResourceId, upload: &ExerciseUpload) -> Envelope<Exercise> {
        self.gateway
            .send(
                ApiRequest::put(ServiceKind::Fitness, exercise_path(id))
                    .multipart(upload.to_multipart()),
            )
            .await
    }

    pub async fn delete(&self, id: &ResourceId) -> Envelope<Value> {
        self.gateway
            .send(ApiRequest::delete(ServiceKind::Fitness, exercise_path(id)))
            .await
    }
}

fn exercise_path(id: &ResourceId) -> String {
    format!("{}/{}", EXERCISES_PATH, id.path_segment())
}
