use anyhow::Context as _;
use coachdesk_client::services::policies::PolicyDraft;

use super::{resource_id, Context};
use crate::cli::args::PoliciesCmd;

pub async fn run(ctx: &Context, cmd: PoliciesCmd) -> anyhow::Result<i32> {
    let policies = &ctx.hooks.policies;
    match cmd {
        PoliciesCmd::List => ctx.output.query(policies.list().await),
        PoliciesCmd::Get(arg) => {
            let id = resource_id("policy", &arg.id)?;
            ctx.output.query(policies.detail(Some(&id)).await)
        }
        PoliciesCmd::Upsert {
            id,
            kind,
            title,
            content_file,
        } => {
            let content = tokio::fs::read_to_string(&content_file)
                .await
                .with_context(|| format!("failed to read {}", content_file.display()))?;
            let draft = PolicyDraft {
                id,
                kind,
                title,
                content,
            };
            ctx.output.envelope(&policies.upsert(&draft).await)
        }
        PoliciesCmd::Delete(arg) => {
            let id = resource_id("policy", &arg.id)?;
            ctx.output.envelope(&policies.delete(&id).await)
        }
    }
}
