//! # List Subcommand
//!
//! Filtered, sorted, paginated listing of the dataset, printed as a table
//! or as the JSON page the API returns.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use evd_core::EvidenceItem;
use evd_query::{paginate, sort_items, Page, DEFAULT_PAGE_SIZE};

use crate::{fit, FilterArgs, SortArgs};

/// Arguments for `evd list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub sort: SortArgs,

    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Print the page as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub fn run_list(args: &ListArgs, data: Option<&Path>) -> Result<u8> {
    let items = crate::load_dataset(data)?;
    let page = list_page(&items, args)?;
    if args.json {
        let json = serde_json::to_string_pretty(&page).context("failed to serialize page")?;
        println!("{json}");
    } else {
        print_table(&page.items);
        println!(
            "Page {} of {} ({} records)",
            page.page, page.total_pages, page.total_items
        );
    }
    Ok(0)
}

/// Apply filter, sort and pagination.
pub fn list_page<'a>(items: &'a [EvidenceItem], args: &ListArgs) -> Result<Page<&'a EvidenceItem>> {
    let filter = args.filter.to_filter()?;
    let sort = args.sort.to_state()?;
    let mut matched = filter.apply(items);
    sort_items(&mut matched, sort);
    tracing::debug!(matched = matched.len(), key = sort.key.as_str(), "list filtered");
    Ok(paginate(matched, args.page, args.page_size)?)
}

pub(crate) fn print_table(items: &[&EvidenceItem]) {
    println!(
        "{:<16} {:<28} {:<14} {:<16} {:<20}",
        "ID", "FILE", "STATUS", "PROVINCE", "UPLOADED"
    );
    for item in items {
        println!(
            "{:<16} {:<28} {:<14} {:<16} {:<20}",
            item.id.as_str(),
            fit(&item.file.name, 28),
            item.status.label(),
            fit(item.scope.display_label(), 16),
            item.uploaded_at.to_iso8601(),
        );
    }
}
