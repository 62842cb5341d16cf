use anyhow::Result;
use smm::{
    api::telegram::TelegramApi,
    models::{Platform, TelegramConnectRequest},
};

use super::{Context, print_accounts, ui};
use crate::cli::TelegramCommand;

pub async fn run(ctx: &Context, command: TelegramCommand) -> Result<()> {
    ctx.require_login()?;
    let api = &ctx.api;

    match command {
        TelegramCommand::Accounts => {
            let accounts = ui::busy("Loading bots...", api.get_accounts()).await?;
            let active = ctx.active_accounts.resolve(Platform::Telegram, &accounts);
            print_accounts(Platform::Telegram, &accounts, active);
        }
        TelegramCommand::Connect { bot_token } => {
            let request = TelegramConnectRequest { bot_token };
            let account = ui::busy("Connecting bot...", api.connect(&request)).await?;
            ui::success(&format!("Connected Telegram bot {}", account.display_name()));
        }
        TelegramCommand::Disconnect { id } => {
            if !ui::confirm(ctx.assume_yes, &format!("Disconnect Telegram bot {id}?"))? {
                ui::notice("Cancelled");
                return Ok(());
            }
            ui::busy("Disconnecting...", api.delete_account(id)).await?;
            if ctx.active_accounts.selected(Platform::Telegram) == Some(id) {
                ctx.active_accounts.forget(Platform::Telegram)?;
            }
            ui::success(&format!("Disconnected Telegram bot {id}"));
        }
        TelegramCommand::Use { id } => {
            let accounts = ui::busy("Loading bots...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Telegram, &accounts, Some(id))?;
            ctx.active_accounts.select(Platform::Telegram, account.id)?;
            ui::success(&format!("Using Telegram bot {}", account.display_name()));
        }
        TelegramCommand::Send {
            chat_id,
            message,
            account,
        } => {
            let accounts = ui::busy("Loading bots...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Telegram, &accounts, account)?;
            ui::busy(
                "Sending message...",
                api.send_message(account.id, &chat_id, &message),
            )
            .await?;
            ui::success(&format!("Message sent to chat {chat_id}"));
        }
    }

    Ok(())
}
