//! `get` command: one-shot fetch, shaped like a widget would see it.

use std::sync::Arc;

use restdeck_core::{CacheUse, FetchResult, Fetcher, FieldSelection, WidgetKind, transform};

use crate::cli::{GetArgs, GlobalOpts, KindArg};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    fetcher: &Arc<Fetcher>,
    args: GetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = util::request_options(&args.request)?;
    let fields: Vec<FieldSelection> =
        args.field.iter().map(|spec| util::parse_field(spec)).collect();

    match fetcher.fetch(&args.url, &options, CacheUse::Bypass).await {
        FetchResult::Success { data, .. } => {
            let rows = transform::rows(&data, &fields, widget_kind(args.kind));
            output::print_output(&output::render_rows(global.output, &rows), global.quiet);
            Ok(())
        }
        FetchResult::Failure { error } => {
            Err(CliError::FetchFailed { url: args.url, reason: error })
        }
    }
}

fn widget_kind(kind: KindArg) -> WidgetKind {
    match kind {
        KindArg::Table => WidgetKind::Table,
        KindArg::Chart => WidgetKind::Chart,
        KindArg::Card => WidgetKind::Card,
    }
}
