use anyhow::Result;
use owo_colors::OwoColorize;
use smm::{
    api::submissions::SubmissionApi,
    models::{NewSubmission, Platform, Submission, SubmissionChangeset, SubmissionStatus},
    schedule::parse_schedule_time,
    submissions::{approve_submission, reject_submission, update_submission},
};

use super::{Context, ui};
use crate::cli::SubmissionCommand;

pub async fn run(ctx: &Context, command: SubmissionCommand) -> Result<()> {
    let user = ctx.require_login()?;
    let api = &ctx.api;

    match command {
        SubmissionCommand::List { status } => {
            let submissions =
                ui::busy("Loading submissions...", api.get_submissions(Some(status))).await?;
            print_submissions(status, &submissions);
        }
        SubmissionCommand::Create {
            platform,
            target,
            at,
            content,
        } => {
            if !user.account_type.submits_for_review() {
                anyhow::bail!("Only subaccounts submit content for review, schedule it instead");
            }
            let submission = NewSubmission {
                platform,
                target_id: target,
                content,
                scheduled_time: at.as_deref().map(parse_schedule_time).transpose()?,
            };
            let created =
                ui::busy("Submitting...", api.create_submission(&submission)).await?;
            ui::success(&format!("Submitted for review (id {})", created.id));
        }
        SubmissionCommand::Update {
            id,
            target,
            at,
            content,
        } => {
            let current = ui::busy("Loading submission...", api.get_submission(id)).await?;

            let mut changeset = SubmissionChangeset::new();
            if let Some(target) = target {
                changeset = changeset.with_target(target);
            }
            if let Some(at) = at {
                changeset = changeset.with_scheduled_time(parse_schedule_time(&at)?);
            }
            if let Some(content) = content {
                changeset = changeset.with_content(content);
            }

            let updated = ui::busy(
                "Updating submission...",
                update_submission(api, &current, &changeset),
            )
            .await?;
            ui::success(&format!("Updated submission {}", updated.id));
        }
        SubmissionCommand::Approve { id, account } => {
            if !user.account_type.can_review_submissions() {
                anyhow::bail!("Only admins review submissions");
            }
            let submission = ui::busy("Loading submission...", api.get_submission(id)).await?;

            let twitter_account = if submission.platform == Platform::Twitter {
                let accounts = ctx.accounts(Platform::Twitter).await?;
                Some(ctx.pick_account(Platform::Twitter, &accounts, account)?.id)
            } else {
                None
            };

            let outcome = ui::busy(
                "Approving...",
                approve_submission(api, api, &submission, twitter_account),
            )
            .await?;

            match &outcome.review {
                Ok(_) => ui::success(&format!("Approved submission {id}")),
                Err(e) => ui::failure(&format!("Recording the approval failed: {e}")),
            }
            match &outcome.post {
                Some(Ok(_)) => ui::success("Posted to Twitter"),
                Some(Err(e)) => ui::failure(&format!("Posting to Twitter failed: {e}")),
                None => {}
            }

            if outcome.is_partial() {
                println!(
                    "{} approval and post are out of sync, check the submission and the timeline",
                    "⚠".yellow()
                );
            }
            if !outcome.is_complete() {
                anyhow::bail!("Approval of submission {id} did not fully succeed");
            }
        }
        SubmissionCommand::Reject { id, reason } => {
            if !user.account_type.can_review_submissions() {
                anyhow::bail!("Only admins review submissions");
            }
            let submission = ui::busy("Loading submission...", api.get_submission(id)).await?;
            ui::busy("Rejecting...", reject_submission(api, &submission, reason)).await?;
            ui::success(&format!("Rejected submission {id}"));
        }
    }

    Ok(())
}

fn print_submissions(status: SubmissionStatus, submissions: &[Submission]) {
    if submissions.is_empty() {
        ui::notice(&format!("No {status} submissions"));
        return;
    }

    let mut table = ui::table(&[
        "Id", "Platform", "Target", "From", "Submitted", "Status", "Content",
    ]);
    for submission in submissions {
        table.add_row(vec![
            submission.id.to_string(),
            submission.platform.to_string(),
            if submission.target_id.is_empty() {
                "-".to_string()
            } else {
                submission.target_id.clone()
            },
            submission.submitter_username.clone(),
            ui::format_time(&submission.submission_time),
            ui::submission_status_label(submission.status),
            ui::truncate(&submission.content, 60),
        ]);
    }
    println!("{table}");

    for submission in submissions {
        if let Some(reason) = &submission.rejection_reason {
            println!("{} submission {}: {}", "✗".bright_red(), submission.id, reason);
        }
    }
}
