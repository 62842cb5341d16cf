use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use smm::{
    api::twitter::TwitterApi,
    cache::{Timeline, TimelineCache, load_timeline},
    models::{Platform, Tweet},
    oauth::{TwitterConnect, parse_callback},
    ratelimit::{self, Cooldown},
};

use super::{Context, print_accounts, ui};
use crate::cli::TwitterCommand;

pub async fn run(ctx: &Context, command: TwitterCommand) -> Result<()> {
    ctx.require_login()?;
    let api = &ctx.api;

    match command {
        TwitterCommand::Accounts => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let active = ctx.active_accounts.resolve(Platform::Twitter, &accounts);
            print_accounts(Platform::Twitter, &accounts, active);
        }
        TwitterCommand::Connect {
            code,
            state,
            callback,
        } => {
            let mut flow = TwitterConnect::new(
                ctx.settings.twitter_client_id.clone(),
                ctx.settings.twitter_redirect_uri.clone(),
                ctx.session.store(),
            );

            let (code, state) = match (code, callback) {
                (Some(code), _) => (code, state),
                (None, Some(callback)) => parse_callback(&callback)?,
                (None, None) => {
                    let url = flow.begin()?;
                    println!("Open this URL to authorize the app:\n\n  {}\n", url.bright_cyan());
                    println!(
                        "Then run `smm twitter connect --callback <redirected URL>` \
(or pass --code and --state)."
                    );
                    return Ok(());
                }
            };

            let account = ui::busy(
                "Connecting Twitter account...",
                flow.complete(api, &code, state.as_deref()),
            )
            .await?;
            ui::success(&format!("Connected Twitter account {}", account.display_name()));
        }
        TwitterCommand::Disconnect { id } => {
            if !ui::confirm(ctx.assume_yes, &format!("Disconnect Twitter account {id}?"))? {
                ui::notice("Cancelled");
                return Ok(());
            }
            ui::busy("Disconnecting...", api.delete_account(id)).await?;
            if ctx.active_accounts.selected(Platform::Twitter) == Some(id) {
                ctx.active_accounts.forget(Platform::Twitter)?;
            }
            TimelineCache::new(ctx.session.store()).clear()?;
            ui::success(&format!("Disconnected Twitter account {id}"));
        }
        TwitterCommand::Use { id } => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Twitter, &accounts, Some(id))?;
            ctx.active_accounts.select(Platform::Twitter, account.id)?;
            ui::success(&format!("Using Twitter account {}", account.display_name()));
        }
        TwitterCommand::Tweet { content, account } => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Twitter, &accounts, account)?;
            let tweet = ui::busy("Posting tweet...", api.post_tweet(account.id, &content))
                .await
                .map_err(ui::explain)?;
            if tweet.id.is_empty() {
                ui::success("Tweet posted");
            } else {
                ui::success(&format!("Tweet posted (id {})", tweet.id));
            }
        }
        TwitterCommand::Timeline {
            count,
            refresh,
            wait,
            account,
        } => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Twitter, &accounts, account)?;
            let cache = TimelineCache::new(ctx.session.store());

            let first = ui::busy(
                "Loading timeline...",
                load_timeline(api, &cache, account.id, count, refresh, Utc::now()),
            )
            .await;

            let timeline = match first {
                Ok(timeline) => timeline,
                Err(e) => match (ratelimit::cooldown_for(&e, Utc::now()), wait) {
                    (Some(cooldown), true) => {
                        ui::notice(&format!("Rate limited: {e}"));
                        count_down(cooldown).await;
                        ui::busy(
                            "Loading timeline...",
                            load_timeline(api, &cache, account.id, count, true, Utc::now()),
                        )
                        .await
                        .map_err(ui::explain)?
                    }
                    (_, _) => return Err(ui::explain(e)),
                },
            };

            print_timeline(&timeline);
        }
        TwitterCommand::Analytics { range, account } => {
            let accounts = ui::busy("Loading accounts...", api.get_accounts()).await?;
            let account = ctx.pick_account(Platform::Twitter, &accounts, account)?;
            let analytics = ui::busy("Loading analytics...", api.get_analytics(account.id, range))
                .await
                .map_err(ui::explain)?;

            println!(
                "{} {} ({})\n",
                "Analytics for".bold(),
                account.display_name().bright_cyan(),
                range.as_str()
            );
            let mut table = ui::table(&["Metric", "Value"]);
            table.add_row(vec!["Followers".to_string(), analytics.followers.to_string()]);
            table.add_row(vec!["Impressions".to_string(), analytics.impressions.to_string()]);
            table.add_row(vec!["Engagements".to_string(), analytics.engagements.to_string()]);
            table.add_row(vec![
                "Engagement rate".to_string(),
                format!("{:.2}%", analytics.engagement_rate()),
            ]);
            table.add_row(vec!["Likes".to_string(), analytics.likes.to_string()]);
            table.add_row(vec!["Retweets".to_string(), analytics.retweets.to_string()]);
            table.add_row(vec!["Replies".to_string(), analytics.replies.to_string()]);
            println!("{table}");

            if !analytics.top_tweets.is_empty() {
                println!("\n{}", "Top tweets".bold());
                println!("{}", tweets_table(&analytics.top_tweets));
            }
        }
    }

    Ok(())
}

/// Blocks until `cooldown` is over, drawing a countdown bar.
async fn count_down(cooldown: Cooldown) {
    let total = cooldown.remaining(Utc::now()).num_seconds().max(0) as u64;
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    while cooldown.is_active(Utc::now()) {
        ticker.tick().await;
        let remaining = cooldown.remaining(Utc::now());
        progress.set_position(total.saturating_sub(remaining.num_seconds().max(0) as u64));
        progress.set_message(format!(
            "retrying in {}",
            ratelimit::format_remaining(remaining)
        ));
    }
    progress.finish_and_clear();
}

fn print_timeline(timeline: &Timeline) {
    if timeline.from_cache {
        ui::notice(&format!(
            "Cached timeline from {}, use --refresh to reload",
            ui::format_time(&timeline.fetched_at)
        ));
    }
    if timeline.tweets.is_empty() {
        ui::notice("Timeline is empty");
        return;
    }
    println!("{}", tweets_table(&timeline.tweets));
}

fn tweets_table(tweets: &[Tweet]) -> comfy_table::Table {
    let mut table = ui::table(&["Posted", "Tweet", "Likes", "Retweets", "Replies"]);
    for tweet in tweets {
        let metrics = tweet.public_metrics.clone().unwrap_or_default();
        table.add_row(vec![
            ui::format_optional_time(tweet.created_at.as_ref()),
            ui::truncate(&tweet.text, 80),
            metrics.like_count.to_string(),
            metrics.retweet_count.to_string(),
            metrics.reply_count.to_string(),
        ]);
    }
    table
}
