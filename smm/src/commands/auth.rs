use anyhow::Result;
use owo_colors::OwoColorize;
use smm::{
    api::auth::AuthApi,
    models::{NewSubaccount, ProfileChangeset, RegisterRequest},
};

use super::{Context, ui};
use crate::cli::{AuthCommand, SubaccountCommand};

pub async fn run(ctx: &Context, command: AuthCommand) -> Result<()> {
    let api = &ctx.api;

    match command {
        AuthCommand::Register {
            username,
            email,
            account_type,
        } => {
            let password = ui::prompt_password("Password:", true)?;
            let request = RegisterRequest {
                username,
                email,
                password,
                account_type,
            };
            let response = ui::busy("Registering...", api.register(&request)).await?;
            ui::success(
                response
                    .message
                    .as_deref()
                    .unwrap_or("Registration successful. You can now log in."),
            );
        }
        AuthCommand::Login { username } => {
            let password = ui::prompt_password("Password:", false)?;
            let user = ui::busy("Logging in...", api.login(&username, &password)).await?;
            ui::success(&format!(
                "Logged in as {} ({})",
                user.username.bright_cyan(),
                user.account_type
            ));
        }
        AuthCommand::Logout => {
            api.logout()?;
            ui::success("Logged out");
        }
        AuthCommand::Whoami => match api.current_user() {
            Some(user) if api.is_logged_in() => {
                println!("{} {}", "Username:".bold(), user.username);
                println!("{} {}", "Email:".bold(), user.email);
                println!("{} {}", "Account type:".bold(), user.account_type);
                println!("{} {}", "Id:".bold(), user.id);
            }
            _ => ui::notice("Not logged in"),
        },
        AuthCommand::Profile { username, email } => {
            ctx.require_login()?;
            let mut changeset = ProfileChangeset::new();
            if let Some(username) = username {
                changeset = changeset.with_username(username);
            }
            if let Some(email) = email {
                changeset = changeset.with_email(email);
            }
            if changeset.is_empty() {
                anyhow::bail!("Nothing to update, pass --username or --email");
            }

            let user = ui::busy("Updating profile...", api.update_profile(&changeset)).await?;
            ui::success(&format!("Profile updated for {}", user.username));
        }
        AuthCommand::Password => {
            ctx.require_login()?;
            let current = ui::prompt_password("Current password:", false)?;
            let new = ui::prompt_password("New password:", true)?;
            ui::busy("Changing password...", api.change_password(&current, &new)).await?;
            ui::success("Password changed");
        }
        AuthCommand::AccountType { account_type } => {
            ctx.require_login()?;
            let user = ui::busy(
                "Updating account type...",
                api.update_account_type(account_type),
            )
            .await?;
            ui::success(&format!("Account type is now {}", user.account_type));
        }
        AuthCommand::Subaccounts(command) => run_subaccounts(ctx, command).await?,
    }

    Ok(())
}

async fn run_subaccounts(ctx: &Context, command: SubaccountCommand) -> Result<()> {
    let user = ctx.require_login()?;
    if !user.account_type.can_manage_subaccounts() {
        anyhow::bail!("Subaccounts cannot manage other subaccounts");
    }
    let api = &ctx.api;

    match command {
        SubaccountCommand::List => {
            let subaccounts = ui::busy("Loading subaccounts...", api.get_subaccounts()).await?;
            if subaccounts.is_empty() {
                ui::notice("No subaccounts yet");
                return Ok(());
            }
            let mut table = ui::table(&["Id", "Username", "Email", "Created"]);
            for subaccount in &subaccounts {
                table.add_row(vec![
                    subaccount.id.to_string(),
                    subaccount.username.clone(),
                    subaccount.email.clone(),
                    ui::format_optional_time(subaccount.created_at.as_ref()),
                ]);
            }
            println!("{table}");
        }
        SubaccountCommand::Create { username, email } => {
            let password = ui::prompt_password("Subaccount password:", true)?;
            let subaccount = NewSubaccount {
                username,
                email,
                password,
            };
            let created =
                ui::busy("Creating subaccount...", api.create_subaccount(&subaccount)).await?;
            ui::success(&format!(
                "Created subaccount {} (id {})",
                created.username, created.id
            ));
        }
        SubaccountCommand::Delete { id } => {
            if !ui::confirm(ctx.assume_yes, &format!("Delete subaccount {id}?"))? {
                ui::notice("Cancelled");
                return Ok(());
            }
            ui::busy("Deleting subaccount...", api.delete_subaccount(id)).await?;
            ui::success(&format!("Deleted subaccount {id}"));
        }
    }

    Ok(())
}
