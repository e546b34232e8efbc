// Command handlers, one module per area of the board
pub mod auth;      // Accounts and session
pub mod bus;       // Bus create, edit, status, delete
pub mod configure; // Configuration management
pub mod list;      // Visible bus list

use crate::config::Config;
use crate::core::operations::{BoardOptions, BusBoard};
use crate::storage::FileKvStore;
use crate::utils::error::AppResult;

/// Open the board backed by the configured data directory
pub fn open_board(config: &Config) -> AppResult<BusBoard<FileKvStore>> {
    let store = FileKvStore::new(&config.general.data_dir);
    BusBoard::open(
        store,
        BoardOptions {
            seed_sample_buses: config.general.seed_sample_buses,
        },
    )
}
