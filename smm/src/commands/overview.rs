use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use smm::{
    api::schedule::ScheduleApi,
    models::{PostStatus, ScheduledPost},
    overview::build_overview,
};

use super::{Context, ui};

pub async fn run(ctx: &Context) -> Result<()> {
    let user = ctx.require_login()?;
    let api = &ctx.api;

    let (scheduled, completed, failed) = ui::busy("Loading dashboard...", async {
        tokio::try_join!(
            api.get_scheduled_posts(Some(PostStatus::Scheduled)),
            api.get_scheduled_posts(Some(PostStatus::Completed)),
            api.get_scheduled_posts(Some(PostStatus::Failed)),
        )
    })
    .await?;

    let overview = build_overview(&scheduled, &completed, failed.len(), &Local::now());

    println!("{} {}\n", "Welcome back,".bold(), user.username.bright_cyan());
    println!(
        "{} upcoming, {} failed\n",
        overview.upcoming_count.to_string().bright_cyan(),
        overview.failed_count.to_string().bright_red()
    );

    println!("{}", "Today's Schedule".bold());
    print_section(&overview.todays_schedule, |post| post.scheduled_time);

    println!("\n{}", "Yesterday's Completed Posts".bold());
    print_section(&overview.yesterdays_completed, |post| {
        post.posted_time.unwrap_or(post.scheduled_time)
    });

    Ok(())
}

fn print_section<F>(posts: &[ScheduledPost], time_of: F)
where
    F: Fn(&ScheduledPost) -> chrono::DateTime<chrono::Utc>,
{
    if posts.is_empty() {
        ui::notice("Nothing here");
        return;
    }

    let mut table = ui::table(&["Time", "Platform", "Id", "Content"]);
    for post in posts {
        table.add_row(vec![
            ui::format_time(&time_of(post)),
            post.platform.to_string(),
            post.id.to_string(),
            ui::truncate(&post.content, 70),
        ]);
    }
    println!("{table}");
}
