use coachdesk_client::services::plans::{PlanListParams, PlanRequest, PlanUpdate};

use super::{resource_id, Context};
use crate::cli::args::PlansCmd;

pub async fn run(ctx: &Context, cmd: PlansCmd) -> anyhow::Result<i32> {
    let plans = &ctx.hooks.plans;
    match cmd {
        PlansCmd::List { user, status, page } => {
            let params = PlanListParams {
                user_id: user,
                status,
                page_index: page.page,
                page_size: page.size,
            };
            ctx.output.query(plans.list(&params).await)
        }
        PlansCmd::Get(arg) => {
            let id = resource_id("plan", &arg.id)?;
            ctx.output.query(plans.detail(Some(&id)).await)
        }
        PlansCmd::Generate {
            user,
            goal,
            weeks,
            days_per_week,
            notes,
        } => {
            if weeks == 0 || days_per_week == 0 || days_per_week > 7 {
                anyhow::bail!("weeks must be positive and days per week between 1 and 7");
            }
            let request = PlanRequest {
                user_id: user,
                goal,
                weeks,
                days_per_week,
                notes,
            };
            ctx.output.envelope(&plans.generate(&request).await)
        }
        PlansCmd::Update { id, title, status } => {
            let id = resource_id("plan", &id)?;
            let update = PlanUpdate {
                title,
                status,
                sessions: None,
            };
            ctx.output.envelope(&plans.update(&id, &update).await)
        }
        PlansCmd::Delete(arg) => {
            let id = resource_id("plan", &arg.id)?;
            ctx.output.envelope(&plans.delete(&id).await)
        }
    }
}
