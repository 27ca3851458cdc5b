use coachdesk_client::services::users::{NewUser, UserListParams, UserUpdate};

use super::{resource_id, Context};
use crate::cli::args::UsersCmd;

pub async fn run(ctx: &Context, cmd: UsersCmd) -> anyhow::Result<i32> {
    let users = &ctx.hooks.users;
    match cmd {
        UsersCmd::List { search, role, page } => {
            let params = UserListParams {
                page_index: page.page,
                page_size: page.size,
                search,
                role,
            };
            ctx.output.query(users.list(&params).await)
        }
        UsersCmd::Get(arg) => {
            let id = resource_id("user", &arg.id)?;
            ctx.output.query(users.detail(Some(&id)).await)
        }
        UsersCmd::Create {
            email,
            name,
            role,
            password,
        } => {
            let user = NewUser {
                email,
                full_name: name,
                role,
                password,
            };
            ctx.output.envelope(&users.create(&user).await)
        }
        UsersCmd::Update {
            id,
            name,
            role,
            active,
        } => {
            let id = resource_id("user", &id)?;
            let update = UserUpdate {
                full_name: name,
                role,
                active,
            };
            ctx.output.envelope(&users.update(&id, &update).await)
        }
        UsersCmd::Delete(arg) => {
            let id = resource_id("user", &arg.id)?;
            ctx.output.envelope(&users.delete(&id).await)
        }
    }
}
