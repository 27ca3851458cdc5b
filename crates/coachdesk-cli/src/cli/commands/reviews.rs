use coachdesk_client::services::reviews::{ReviewDecision, ReviewListParams};

use super::{resource_id, Context};
use crate::cli::args::ReviewsCmd;

pub async fn run(ctx: &Context, cmd: ReviewsCmd) -> anyhow::Result<i32> {
    let reviews = &ctx.hooks.reviews;
    match cmd {
        ReviewsCmd::List {
            status,
            advisor,
            page,
        } => {
            let params = ReviewListParams {
                status,
                advisor_id: advisor,
                page_index: page.page,
                page_size: page.size,
            };
            ctx.output.query(reviews.list(&params).await)
        }
        ReviewsCmd::Get(arg) => {
            let id = resource_id("review", &arg.id)?;
            ctx.output.query(reviews.detail(Some(&id)).await)
        }
        ReviewsCmd::Approve { id, comment } => {
            let id = resource_id("review", &id)?;
            let decision = ReviewDecision { comment };
            ctx.output.envelope(&reviews.approve(&id, &decision).await)
        }
        ReviewsCmd::Reject { id, comment } => {
            let id = resource_id("review", &id)?;
            let decision = ReviewDecision { comment };
            ctx.output.envelope(&reviews.reject(&id, &decision).await)
        }
    }
}
