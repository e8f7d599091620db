// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # Chat Sample: Chatter
//!
//! Publishes a name record and a short series of chat messages into the
//! `ChatRoom` partition, then withdraws them.
//!
//! ## What You'll Learn
//!
//! - Changing the participant's default topic QoS
//! - Combining writer and topic QoS (`copy_from_topic_qos`)
//! - Registering an instance and writing with its handle
//! - Disposing and unregistering instances before teardown
//!
//! ## Running the Sample
//!
//! ```bash
//! # Terminal 1 - the board
//! cargo run --bin messageboard
//!
//! # Terminal 2 - a chatter with id 5 called Alice
//! cargo run --bin chatter -- 5 Alice
//!
//! # Close the board
//! cargo run --bin chatter -- -1
//! ```

use chatdds_chat::check::check_chat;
use chatdds_chat::config::parse_transport;
use chatdds_chat::{ChatSettings, Chatter};
use clap::Parser;
use std::io;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "chatter")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publish a name and ten chat messages (sender -1 closes the board)")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Sender id (-1 sends the termination message)
    #[arg(default_value_t = 1)]
    user_id: i32,

    /// Display name (default "Chatter <id>")
    display_name: Option<String>,

    /// DDS domain ID (overrides CHAT_DOMAIN_ID)
    #[arg(short, long)]
    domain: Option<u32>,

    /// Transport: udp or intra (overrides CHAT_TRANSPORT)
    #[arg(short, long)]
    transport: Option<String>,

    /// Partition (overrides CHAT_PARTITION)
    #[arg(short, long)]
    partition: Option<String>,

    /// Pause between messages in milliseconds
    #[arg(long, default_value = "1000")]
    interval_ms: u64,

    /// Verbose mode (show middleware logs)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("chatter=debug,chatdds_chat=debug,chatdds=debug")
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
    settings = settings.with_send_interval(Duration::from_millis(cli.interval_ms));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let chatter = check_chat(Chatter::open(
        &settings,
        cli.user_id,
        cli.display_name,
        &mut out,
    ));
    let report = check_chat(chatter.run(&mut out));
    tracing::debug!(
        writes = report.messages.writes,
        disposes = report.messages.disposes,
        "run finished"
    );
    check_chat(chatter.close(&mut out));
}
