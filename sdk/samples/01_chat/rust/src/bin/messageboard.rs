// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Chat Sample: MessageBoard
//!
//! Prints every chat message published into the `ChatRoom` partition and
//! reports chatters joining and leaving. A message from sender `-1` closes
//! the board; so does Ctrl-C.
//!
//! ## What You'll Learn
//!
//! - Best-effort readers matching reliable writers
//! - Transient durability for late joiners (the name topic)
//! - Blocking on a WaitSet instead of sleeping between polls
//! - Using a GuardCondition to leave a wait from a signal handler
//!
//! ## Running the Sample
//!
//! ```bash
//! # Terminal 1
//! cargo run --bin messageboard
//!
//! # Terminal 2
//! cargo run --bin chatter -- 5 Alice
//! cargo run --bin chatter -- -1
//! ```

use chatdds::GuardCondition;
use chatdds_chat::check::check_chat;
use chatdds_chat::config::parse_transport;
use chatdds_chat::{BoardOutcome, ChatSettings, MessageBoard};
use clap::Parser;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "messageboard")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Print chat messages until a sender -1 message arrives")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Sender id to ignore (accepted, not applied)
    ignored_user_id: Option<i32>,

    /// DDS domain ID (overrides CHAT_DOMAIN_ID)
    #[arg(short, long)]
    domain: Option<u32>,

    /// Transport: udp or intra (overrides CHAT_TRANSPORT)
    #[arg(short, long)]
    transport: Option<String>,

    /// Partition (overrides CHAT_PARTITION)
    #[arg(short, long)]
    partition: Option<String>,

    /// Longest single wait in milliseconds
    #[arg(long, default_value = "100")]
    poll_ms: u64,

    /// Verbose mode (show middleware logs)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("messageboard=debug,chatdds_chat=debug,chatdds=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let mut settings = check_chat(ChatSettings::from_env());
    if let Some(domain) = cli.domain {
        settings = settings.with_domain_id(domain);
    }
    if let Some(transport) = &cli.transport {
        settings = settings.with_transport(check_chat(parse_transport(transport)));
    }
    if let Some(partition) = &cli.partition {
        settings = settings.with_partition(partition);
    }
    settings = settings.with_poll_interval(Duration::from_millis(cli.poll_ms));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut board = check_chat(MessageBoard::open(&settings, cli.ignored_user_id, &mut out));

    // Setup Ctrl+C handler
    let stop = Arc::new(GuardCondition::new());
    let trigger = Arc::clone(&stop);
    let _ = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, closing the board...");
        trigger.set_trigger_value(true);
    });

    let report = check_chat(board.run(&mut out, &stop));
    if report.outcome == BoardOutcome::Interrupted {
        tracing::info!(shown = report.messages_shown, "board interrupted");
    }
    check_chat(board.close());
}
