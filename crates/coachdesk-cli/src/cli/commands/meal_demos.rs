use coachdesk_client::services::meal_demos::MealDemoUpload;
use coachdesk_client::{FileUpload, PageParams};

use super::{resource_id, Context};
use crate::cli::args::MealDemosCmd;
use crate::cli::helpers::parse_ingredient;

pub async fn run(ctx: &Context, cmd: MealDemosCmd) -> anyhow::Result<i32> {
    let meal_demos = &ctx.hooks.meal_demos;
    match cmd {
        MealDemosCmd::List(page) => {
            let page = PageParams::from(&page);
            ctx.output.query(meal_demos.list(&page).await)
        }
        MealDemosCmd::Get(arg) => {
            let id = resource_id("meal demo", &arg.id)?;
            ctx.output.query(meal_demos.detail(Some(&id)).await)
        }
        MealDemosCmd::Create {
            title,
            calories,
            image,
            ingredients,
        } => {
            let image = match image {
                Some(path) => Some(FileUpload::from_path(path).await?),
                None => None,
            };
            let ingredients = ingredients
                .iter()
                .map(|raw| parse_ingredient(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let upload = MealDemoUpload {
                title,
                calories,
                image,
                ingredients,
            };
            ctx.output.envelope(&meal_demos.create(&upload).await)
        }
        MealDemosCmd::Delete(arg) => {
            let id = resource_id("meal demo", &arg.id)?;
            ctx.output.envelope(&meal_demos.delete(&id).await)
        }
    }
}
