use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use smm::{
    models::{NewScheduledPost, Platform, PostStatus, ScheduledPost, ScheduledPostChangeset},
    schedule::{ScheduleBoard, parse_schedule_time},
};

use super::{Context, ui};
use crate::cli::ScheduleCommand;

pub async fn run(ctx: &Context, command: ScheduleCommand) -> Result<()> {
    ctx.require_login()?;

    match command {
        ScheduleCommand::List { status } => {
            let board = ui::busy("Loading posts...", ScheduleBoard::load(&ctx.api, status)).await?;
            print_posts(board.status(), board.posts());
        }
        ScheduleCommand::Create {
            platform,
            at,
            target,
            account,
            content,
        } => {
            let scheduled_time = parse_schedule_time(&at)?;
            if platform != Platform::Twitter && target.is_empty() {
                anyhow::bail!("--target is required for {platform} posts");
            }

            let accounts = ctx.accounts(platform).await?;
            let account = ctx.pick_account(platform, &accounts, account)?;

            let post = NewScheduledPost {
                platform,
                platform_account_id: account.id,
                target_id: if platform == Platform::Twitter {
                    String::new()
                } else {
                    target
                },
                content,
                scheduled_time,
            };

            let mut board = ScheduleBoard::new(&ctx.api, PostStatus::Scheduled);
            let created =
                ui::busy("Scheduling post...", board.create(&post, Utc::now())).await?;
            ui::success(&format!(
                "Scheduled post {} on {} for {}",
                created.id,
                created.platform,
                ui::format_time(&created.scheduled_time)
            ));
            print_posts(board.status(), board.posts());
        }
        ScheduleCommand::Update {
            id,
            at,
            target,
            content,
        } => {
            let mut changeset = ScheduledPostChangeset::new();
            if let Some(at) = at {
                changeset = changeset.with_scheduled_time(parse_schedule_time(&at)?);
            }
            if let Some(target) = target {
                changeset = changeset.with_target(target);
            }
            if let Some(content) = content {
                changeset = changeset.with_content(content);
            }
            if changeset.is_empty() {
                anyhow::bail!("Nothing to update, pass --at, --target or --content");
            }

            let mut board =
                ui::busy("Loading posts...", ScheduleBoard::load(&ctx.api, PostStatus::Scheduled))
                    .await?;
            let updated =
                ui::busy("Updating post...", board.update(id, &changeset, Utc::now())).await?;
            ui::success(&format!(
                "Updated post {} ({})",
                updated.id,
                ui::format_time(&updated.scheduled_time)
            ));
            print_posts(board.status(), board.posts());
        }
        ScheduleCommand::Delete { id } => {
            if !ui::confirm(ctx.assume_yes, &format!("Delete scheduled post {id}?"))? {
                ui::notice("Cancelled");
                return Ok(());
            }

            let mut board =
                ui::busy("Loading posts...", ScheduleBoard::load(&ctx.api, PostStatus::Scheduled))
                    .await?;
            ui::busy("Deleting post...", board.delete(id)).await?;
            ui::success(&format!("Deleted post {id}"));
            print_posts(board.status(), board.posts());
        }
    }

    Ok(())
}

fn print_posts(status: PostStatus, posts: &[ScheduledPost]) {
    if posts.is_empty() {
        ui::notice(&format!("No {status} posts"));
        return;
    }

    let time_header = match status {
        PostStatus::Scheduled => "Scheduled for",
        PostStatus::Completed => "Posted",
        PostStatus::Failed => "Scheduled for",
    };
    let mut table = ui::table(&["Id", "Platform", "Target", time_header, "Status", "Content"]);
    for post in posts {
        let time = match status {
            PostStatus::Completed => post.posted_time.unwrap_or(post.scheduled_time),
            _ => post.scheduled_time,
        };
        table.add_row(vec![
            post.id.to_string(),
            post.platform.to_string(),
            if post.target_id.is_empty() {
                "-".to_string()
            } else {
                post.target_id.clone()
            },
            ui::format_time(&time),
            ui::post_status_label(post.status),
            ui::truncate(&post.content, 60),
        ]);
    }
    println!("{table}");

    for post in posts.iter().filter(|post| post.status == PostStatus::Failed) {
        if let Some(error) = &post.error_message {
            println!("{} post {}: {}", "✗".bright_red(), post.id, error);
        }
    }
}
