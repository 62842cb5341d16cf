mod ai;
mod auth;
mod discord;
mod overview;
mod schedule;
mod submissions;
mod telegram;
mod twitter;
mod ui;

use std::{io, sync::Arc};

use anyhow::{Context as _, Result};
use clap::CommandFactory;
use clap_complete::generate;
use log::debug;
use smm::{
    accounts::ActiveAccounts,
    api::{ApiClient, discord::DiscordApi, telegram::TelegramApi, twitter::TwitterApi},
    models::{Platform, PlatformAccount, User},
    session::Session,
    settings::{self, ResolvedSettings, Settings},
    store::{FileStore, KeyValueStore},
};

use crate::cli::{Args, Command};

pub struct Context {
    pub api: ApiClient,
    pub session: Session,
    pub settings: ResolvedSettings,
    pub active_accounts: ActiveAccounts,
    pub assume_yes: bool,
}

impl Context {
    /// Advisory check against the stored session. The backend still rejects
    /// requests with a bad token.
    pub fn require_login(&self) -> Result<User> {
        if !self.session.is_logged_in() {
            anyhow::bail!("Not logged in. Run `smm auth login` first.");
        }
        self.session
            .current_user()
            .context("Stored session is incomplete. Run `smm auth login` again.")
    }

    /// Picks `explicit` if given, otherwise the active account of `platform`.
    pub fn pick_account(
        &self,
        platform: Platform,
        accounts: &[PlatformAccount],
        explicit: Option<i64>,
    ) -> Result<PlatformAccount> {
        if let Some(id) = explicit {
            return accounts
                .iter()
                .find(|account| account.id == id)
                .cloned()
                .with_context(|| format!("No {platform} account with id {id}"));
        }

        self.active_accounts
            .resolve(platform, accounts)
            .cloned()
            .with_context(|| format!("No {platform} account connected"))
    }

    pub async fn accounts(&self, platform: Platform) -> Result<Vec<PlatformAccount>> {
        let accounts = ui::busy("Loading accounts...", async {
            match platform {
                Platform::Twitter => TwitterApi::get_accounts(&self.api).await,
                Platform::Discord => DiscordApi::get_accounts(&self.api).await,
                Platform::Telegram => TelegramApi::get_accounts(&self.api).await,
            }
        })
        .await?;
        Ok(accounts)
    }
}

pub async fn run(args: Args) -> Result<()> {
    let command = match args.command {
        Command::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            return Ok(());
        }
        command => command,
    };

    let cli_settings = Settings {
        api_url: args.api_url.clone(),
        timeout_secs: args.timeout_secs,
        twitter_client_id: args.twitter_client_id.clone(),
        twitter_redirect_uri: args.twitter_redirect_uri.clone(),
        discord_client_id: args.discord_client_id.clone(),
        discord_redirect_uri: args.discord_redirect_uri.clone(),
        store_path: args.store_path.clone(),
    };
    let settings = cli_settings
        .or(settings::load_settings().context("Failed to load settings")?)
        .resolve();

    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&settings.store_path)
            .with_context(|| format!("Failed to open {}", settings.store_path.display()))?,
    );
    let session = Session::new(Arc::clone(&store));
    let api = ApiClient::new(&settings.api_url, settings.timeout, session.clone())?;
    debug!("using backend {}", api.base_url());

    let ctx = Context {
        api,
        session,
        settings,
        active_accounts: ActiveAccounts::new(store),
        assume_yes: args.yes,
    };

    match command {
        Command::Auth(command) => auth::run(&ctx, command).await,
        Command::Twitter(command) => twitter::run(&ctx, command).await,
        Command::Discord(command) => discord::run(&ctx, command).await,
        Command::Telegram(command) => telegram::run(&ctx, command).await,
        Command::Schedule(command) => schedule::run(&ctx, command).await,
        Command::Submissions(command) => submissions::run(&ctx, command).await,
        Command::Ai(command) => ai::run(&ctx, command).await,
        Command::Overview => overview::run(&ctx).await,
        // Answered before any state is opened
        Command::Completions { .. } => Ok(()),
    }
}

pub(crate) fn print_accounts(
    platform: Platform,
    accounts: &[PlatformAccount],
    active: Option<&PlatformAccount>,
) {
    if accounts.is_empty() {
        ui::notice(&format!("No {platform} account connected"));
        return;
    }

    let mut table = ui::table(&["", "Id", "Account", "Connected"]);
    for account in accounts {
        let marker = if active.is_some_and(|a| a.id == account.id) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            account.id.to_string(),
            account.display_name(),
            ui::format_optional_time(account.connected_at.as_ref()),
        ]);
    }
    println!("{table}");
}
