pub use bubbledash_cli::{Args, SortColumn};

use crate::table::SortState;

/// Startup table sort from `--sort` and `--descending`.
pub fn initial_sort(args: &Args) -> SortState {
    match args.sort {
        Some(column) if args.descending => SortState::descending(column.index()),
        Some(column) => SortState::ascending(column.index()),
        None => SortState::default(),
    }
}
