//! `probe` command: discover displayable fields on an endpoint.

use std::sync::Arc;

use restdeck_core::{FetchResult, Fetcher};

use crate::cli::{GlobalOpts, ProbeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    fetcher: &Arc<Fetcher>,
    args: ProbeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let options = util::request_options(&args.request)?;
    let probe = fetcher.probe(&args.url, &options, usize::from(args.depth)).await;

    let data = match probe.fetch {
        FetchResult::Success { data, .. } => data,
        FetchResult::Failure { error } => {
            return Err(CliError::FetchFailed { url: args.url, reason: error });
        }
    };

    if probe.fields.is_empty() && !args.show_data {
        tracing::info!(url = %args.url, "response holds no scalar fields; try --show-data");
    }

    let rendered = if args.show_data {
        output::render_value(global.output, &data)
    } else {
        output::render_fields(global.output, &probe.fields)
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}
