use anyhow::Result;
use smm::{api::ai::AiApi, models::GenerateRequest};

use super::{Context, ui};
use crate::cli::AiCommand;

pub async fn run(ctx: &Context, command: AiCommand) -> Result<()> {
    ctx.require_login()?;

    match command {
        AiCommand::Generate {
            platform,
            max_length,
            prompt,
        } => {
            let mut request = GenerateRequest::new(prompt, platform);
            if let Some(max_length) = max_length {
                request = request.with_max_length(max_length);
            }

            let generated = ui::busy("Generating content...", ctx.api.generate(&request)).await?;
            println!("{}", generated.content.trim());
        }
    }

    Ok(())
}
