//! # Review Subcommand
//!
//! Prints the review queue: per-status counts followed by the pending
//! records under the active filter and sort.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use evd_query::{review_queue, QueueSummary};
use serde::Serialize;

use crate::{FilterArgs, SortArgs};

/// Arguments for `evd review`.
#[derive(Args, Debug)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// Only records without an assigned reviewer.
    #[arg(long)]
    pub unassigned: bool,

    /// Print summary and queue as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct QueueOutput<'a> {
    summary: QueueSummary,
    queue: Vec<&'a evd_core::EvidenceItem>,
}

pub fn run_review(args: &ReviewArgs, data: Option<&Path>) -> Result<u8> {
    let items = crate::load_dataset(data)?;
    let filter = args.filter.to_filter()?;
    let sort = args.sort.to_state()?;

    let mut queue = review_queue(&items, &filter, sort);
    let summary = QueueSummary::from_items(queue.iter().copied());
    if args.unassigned {
        queue.retain(|item| item.review.assigned_reviewer.is_none());
    }
    tracing::debug!(pending = summary.total, shown = queue.len(), "review queue built");

    if args.json {
        let output = QueueOutput { summary, queue };
        let json = serde_json::to_string_pretty(&output).context("failed to serialize queue")?;
        println!("{json}");
        return Ok(0);
    }

    println!(
        "Submitted: {}  In review: {}  Need more info: {}  Unassigned: {}  Total: {}",
        summary.submitted,
        summary.in_review,
        summary.need_more_info,
        summary.unassigned,
        summary.total
    );
    println!();
    crate::list::print_table(&queue);
    Ok(0)
}
