use coachdesk_client::services::exercises::{ExerciseListParams, ExerciseUpload};
use coachdesk_client::FileUpload;

use super::{resource_id, Context};
use crate::cli::args::{ExerciseForm, ExercisesCmd};
use crate::cli::helpers::parse_steps;

pub async fn run(ctx: &Context, cmd: ExercisesCmd) -> anyhow::Result<i32> {
    let exercises = &ctx.hooks.exercises;
    match cmd {
        ExercisesCmd::List {
            muscle_group,
            search,
            page,
        } => {
            let params = ExerciseListParams {
                muscle_group,
                search,
                page_index: page.page,
                page_size: page.size,
            };
            ctx.output.query(exercises.list(&params).await)
        }
        ExercisesCmd::Get(arg) => {
            let id = resource_id("exercise", &arg.id)?;
            ctx.output.query(exercises.detail(Some(&id)).await)
        }
        ExercisesCmd::Create(form) => {
            let upload = build_upload(form).await?;
            ctx.output.envelope(&exercises.create(&upload).await)
        }
        ExercisesCmd::Update { id, form } => {
            let id = resource_id("exercise", &id)?;
            let upload = build_upload(form).await?;
            ctx.output.envelope(&exercises.update(&id, &upload).await)
        }
        ExercisesCmd::Delete(arg) => {
            let id = resource_id("exercise", &arg.id)?;
            ctx.output.envelope(&exercises.delete(&id).await)
        }
    }
}

async fn build_upload(form: ExerciseForm) -> anyhow::Result<ExerciseUpload> {
    let video = match &form.video {
        Some(path) => Some(FileUpload::from_path(path).await?),
        None => None,
    };
    Ok(ExerciseUpload {
        steps: parse_steps(&form.steps)?,
        name: form.name,
        muscle_group: form.muscle_group,
        difficulty: form.difficulty,
        description: form.description,
        video,
    })
}
