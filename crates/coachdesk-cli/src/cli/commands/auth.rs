use coachdesk_client::services::auth::Credentials;
use tracing::info;

use super::Context;
use crate::cli::args::LoginArgs;

pub async fn login(ctx: &Context, args: LoginArgs) -> anyhow::Result<i32> {
    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };
    let envelope = ctx.services.auth.login(&credentials).await;
    if envelope.success {
        info!(email = %credentials.email, "session token stored");
    }
    // Never echo the token itself.
    ctx.output.envelope(&envelope.map(|session| session.user))
}

pub async fn logout(ctx: &Context) -> anyhow::Result<i32> {
    let envelope = ctx.services.auth.logout().await;
    ctx.hooks.client.clear();
    ctx.output.envelope(&envelope)
}
