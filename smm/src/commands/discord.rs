use anyhow::Result;
use owo_colors::OwoColorize;
use smm::{
    api::discord::DiscordApi,
    models::Platform,
    oauth::{DiscordConnect, parse_callback},
};

use super::{Context, print_accounts, ui};
use crate::cli::DiscordCommand;

pub async fn run(ctx: &Context, command: DiscordCommand) -> Result<()> {
    ctx.require_login()?;
    let api = &ctx.api;

    match command {
        DiscordCommand::Accounts => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let active = ctx.active_accounts.resolve(Platform::Discord, &accounts);
            print_accounts(Platform::Discord, &accounts, active);
        }
        DiscordCommand::Connect { code, callback } => {
            let mut flow = DiscordConnect::new(
                ctx.settings.discord_client_id.clone(),
                ctx.settings.discord_redirect_uri.clone(),
            );

            let code = match (code, callback) {
                (Some(code), _) => code,
                (None, Some(callback)) => parse_callback(&callback)?.0,
                (None, None) => {
                    let url = flow.authorize_url()?;
                    println!("Open this URL to add the bot:\n\n  {}\n", url.bright_cyan());
                    println!("Then run `smm discord connect --callback <redirected URL>`.");
                    return Ok(());
                }
            };

            let account =
                ui::busy("Connecting Discord account...", flow.complete(api, &code)).await?;
            ui::success(&format!("Connected Discord account {}", account.display_name()));
        }
        DiscordCommand::Disconnect { id } => {
            if !ui::confirm(ctx.assume_yes, &format!("Disconnect Discord account {id}?"))? {
                ui::notice("Cancelled");
                return Ok(());
            }
            ui::busy("Disconnecting...", api.delete_account(id)).await?;
            if ctx.active_accounts.selected(Platform::Discord) == Some(id) {
                ctx.active_accounts.forget(Platform::Discord)?;
            }
            ui::success(&format!("Disconnected Discord account {id}"));
        }
        DiscordCommand::Use { id } => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Discord, &accounts, Some(id))?;
            ctx.active_accounts.select(Platform::Discord, account.id)?;
            ui::success(&format!("Using Discord account {}", account.display_name()));
        }
        DiscordCommand::Servers => {
            let servers = ui::busy("Loading servers...", api.get_servers()).await?;
            if servers.is_empty() {
                ui::notice("The bot is not a member of any server");
                return Ok(());
            }
            let mut table = ui::table(&["Id", "Name", "Members"]);
            for server in &servers {
                table.add_row(vec![
                    server.id.clone(),
                    server.name.clone(),
                    server
                        .member_count
                        .map(|count| count.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{table}");
        }
        DiscordCommand::Channels { server_id } => {
            let channels = ui::busy("Loading channels...", api.get_channels(&server_id)).await?;
            let mut table = ui::table(&["Id", "Channel"]);
            for channel in &channels {
                table.add_row(vec![channel.id.clone(), format!("#{}", channel.name)]);
            }
            println!("{table}");
        }
        DiscordCommand::Messages { channel_id, limit } => {
            let messages =
                ui::busy("Loading messages...", api.get_messages(&channel_id, limit)).await?;
            if messages.is_empty() {
                ui::notice("No messages");
                return Ok(());
            }
            let mut table = ui::table(&["Sent", "Author", "Message"]);
            for message in &messages {
                table.add_row(vec![
                    ui::format_optional_time(message.timestamp.as_ref()),
                    message.author_username.clone(),
                    ui::truncate(&message.content, 80),
                ]);
            }
            println!("{table}");
        }
        DiscordCommand::Send {
            channel_id,
            content,
        } => {
            ui::busy("Sending message...", api.send_message(&channel_id, &content)).await?;
            ui::success(&format!("Message sent to channel {channel_id}"));
        }
    }

    Ok(())
}
