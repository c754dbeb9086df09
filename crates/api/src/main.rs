//! SlotHold - hold a booking slot until interrupted
//!
//! ```text
//! slothold <event-type-id> <event-length> <timeslot> [duration]
//! ```
//!
//! Reserves the slot, keeps renewing it on the heartbeat, and releases it on
//! Ctrl-C.

use anyhow::{bail, Context, Result};
use slothold_domain::EventType;
use slothold_lib::utils::logging::init_tracing;
use slothold_lib::{
    clear_selection, current_hold, select_duration, select_event, select_slot, AppContext,
};
use tracing::{info, warn};

const USAGE: &str = "usage: slothold <event-type-id> <event-length> <timeslot> [duration]";

struct Args {
    event: EventType,
    timeslot: String,
    duration: Option<u32>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let (Some(id), Some(length), Some(timeslot)) = (args.next(), args.next(), args.next()) else {
        bail!(USAGE);
    };
    let id: u32 = id.parse().with_context(|| format!("invalid event type id '{id}'"))?;
    let length: u32 =
        length.parse().with_context(|| format!("invalid event length '{length}'"))?;
    let duration = args
        .next()
        .map(|raw| raw.parse::<u32>().with_context(|| format!("invalid duration '{raw}'")))
        .transpose()?;

    Ok(Args { event: EventType::new(id, length), timeslot, duration })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before logging so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();
    init_tracing();
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "no .env file loaded"),
    }

    let args = parse_args(std::env::args().skip(1))?;

    let ctx = AppContext::new().await.context("failed to initialise application context")?;
    select_event(&ctx, Some(args.event)).await?;
    select_duration(&ctx, args.duration).await?;
    select_slot(&ctx, &args.timeslot).await?;

    info!(
        event_type_id = %args.event.id,
        timeslot = %args.timeslot,
        "holding slot; press Ctrl-C to release"
    );

    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    let status = current_hold(&ctx).await?;
    info!(reservation_id = ?status.reservation_id, "releasing hold");
    clear_selection(&ctx).await?;
    ctx.shutdown().await?;

    Ok(())
}
