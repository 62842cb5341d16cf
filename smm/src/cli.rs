use std::{fmt, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::LevelFilter;
use smm::models::{AccountType, Platform, PostStatus, SubmissionStatus, TimeRange};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Backend API base URL
    #[arg(long, env = "SMM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "SMM_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// File holding the session and local caches
    #[arg(long = "store", env = "SMM_STORE", global = true)]
    pub store_path: Option<PathBuf>,

    /// Twitter OAuth client id
    #[arg(long, env = "SMM_TWITTER_CLIENT_ID", global = true, hide_env_values = true)]
    pub twitter_client_id: Option<String>,

    /// Twitter OAuth redirect URI
    #[arg(long, env = "SMM_TWITTER_REDIRECT_URI", global = true)]
    pub twitter_redirect_uri: Option<String>,

    /// Discord OAuth client id
    #[arg(long, env = "SMM_DISCORD_CLIENT_ID", global = true, hide_env_values = true)]
    pub discord_client_id: Option<String>,

    /// Discord OAuth redirect URI
    #[arg(long, env = "SMM_DISCORD_REDIRECT_URI", global = true)]
    pub discord_redirect_uri: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Account, profile and subaccounts
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Twitter accounts, tweets, timeline and analytics
    #[command(subcommand)]
    Twitter(TwitterCommand),
    /// Discord accounts, servers, channels and messages
    #[command(subcommand)]
    Discord(DiscordCommand),
    /// Telegram bots and messages
    #[command(subcommand)]
    Telegram(TelegramCommand),
    /// Scheduled posts
    #[command(subcommand)]
    Schedule(ScheduleCommand),
    /// Subaccount submissions and their review
    #[command(subcommand)]
    Submissions(SubmissionCommand),
    /// AI assisted content
    #[command(subcommand)]
    Ai(AiCommand),
    /// Today's schedule and yesterday's completed posts
    Overview,
    /// Print shell completions
    Completions {
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Create a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, value_enum, default_value_t = AccountType::Individual)]
        account_type: AccountType,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        username: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the stored profile (no network call)
    Whoami,
    /// Change username or email
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the password
    Password,
    /// Switch the account type
    AccountType {
        #[arg(value_enum)]
        account_type: AccountType,
    },
    /// Manage subaccounts
    #[command(subcommand)]
    Subaccounts(SubaccountCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubaccountCommand {
    List,
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TwitterCommand {
    /// List connected accounts
    Accounts,
    /// Print the authorization URL, or finish the flow with the returned code
    Connect {
        /// Authorization code returned by Twitter
        #[arg(long, conflicts_with = "callback")]
        code: Option<String>,
        /// State returned by Twitter
        #[arg(long, requires = "code")]
        state: Option<String>,
        /// Full URL Twitter redirected to
        #[arg(long)]
        callback: Option<String>,
    },
    /// Remove a connected account
    Disconnect { id: i64 },
    /// Pick the account used by the other commands
    Use { id: i64 },
    /// Post a tweet right away
    Tweet {
        content: String,
        #[arg(long)]
        account: Option<i64>,
    },
    /// Show the home timeline (cached for 15 minutes)
    Timeline {
        #[arg(long, default_value_t = 20)]
        count: u32,
        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
        /// When rate limited, wait for the cooldown and try once more
        #[arg(long)]
        wait: bool,
        #[arg(long)]
        account: Option<i64>,
    },
    /// Show engagement analytics
    Analytics {
        #[arg(long, value_enum, default_value = "7d")]
        range: TimeRange,
        #[arg(long)]
        account: Option<i64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DiscordCommand {
    Accounts,
    /// Print the authorization URL, or finish the flow with the returned code
    Connect {
        #[arg(long, conflicts_with = "callback")]
        code: Option<String>,
        #[arg(long)]
        callback: Option<String>,
    },
    Disconnect {
        id: i64,
    },
    Use {
        id: i64,
    },
    /// Servers the bot is a member of
    Servers,
    Channels {
        server_id: String,
    },
    Messages {
        channel_id: String,
        #[arg(long)]
        limit: Option<u32>,
    },
    Send {
        channel_id: String,
        content: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TelegramCommand {
    Accounts,
    /// Register a bot by its token
    Connect {
        #[arg(long, env = "SMM_TELEGRAM_BOT_TOKEN", hide_env_values = true)]
        bot_token: String,
    },
    Disconnect {
        id: i64,
    },
    Use {
        id: i64,
    },
    Send {
        chat_id: String,
        message: String,
        #[arg(long)]
        account: Option<i64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScheduleCommand {
    List {
        #[arg(long, value_enum, default_value_t = PostStatus::Scheduled)]
        status: PostStatus,
    },
    Create {
        #[arg(long, value_enum)]
        platform: Platform,
        /// Local `YYYY-MM-DD HH:MM` or RFC 3339
        #[arg(long)]
        at: String,
        /// Channel or chat id, not used for Twitter
        #[arg(long, default_value = "")]
        target: String,
        #[arg(long)]
        account: Option<i64>,
        content: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubmissionCommand {
    List {
        #[arg(long, value_enum, default_value_t = SubmissionStatus::Pending)]
        status: SubmissionStatus,
    },
    /// Submit content for review
    Create {
        #[arg(long, value_enum)]
        platform: Platform,
        #[arg(long, default_value = "")]
        target: String,
        #[arg(long)]
        at: Option<String>,
        content: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        target: Option<String>,
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Approve; Twitter submissions are posted right away
    Approve {
        id: i64,
        /// Twitter account to post from
        #[arg(long)]
        account: Option<i64>,
    },
    Reject {
        id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum AiCommand {
    /// Draft a post from a prompt
    Generate {
        #[arg(long, value_enum)]
        platform: Platform,
        #[arg(long)]
        max_length: Option<u32>,
        prompt: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}
