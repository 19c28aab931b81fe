//! Arena client entrypoint.
//!
//! Usage:
//!   holdem-bot --team <name> [--url ws://127.0.0.1:9876/ws] [--bot A|B]
//!              [--log-level info]
//!
//! Exits 0 on a clean `match_end`; transport failures exit non-zero.

use clap::{Parser, ValueEnum};

use holdem_bot::{BotError, HoldemBot};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BotSlot {
    #[value(name = "A")]
    A,
    #[value(name = "B")]
    B,
}

impl BotSlot {
    fn as_str(self) -> &'static str {
        match self {
            BotSlot::A => "A",
            BotSlot::B => "B",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "holdem-bot",
    about = "Heads-up no-limit hold'em agent for the arena game server."
)]
struct Args {
    /// Registered team name.
    #[arg(long)]
    team: String,

    /// WebSocket URL of the game server.
    #[arg(long, default_value = "ws://127.0.0.1:9876/ws")]
    url: String,

    /// Optional practice slot label.
    #[arg(long, value_enum)]
    bot: Option<BotSlot>,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BotError> {
    let args = Args::parse();
    env_logger::init_from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, args.log_level),
    );

    let mut bot = HoldemBot::new(args.team, args.bot.map(|slot| slot.as_str().to_string()));
    bot.connect_and_play(&args.url).await
}
