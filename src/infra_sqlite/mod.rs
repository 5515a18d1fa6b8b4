mod user_repo_sqlite;
mod uuid_map_repo_sqlite;

pub use user_repo_sqlite::*;
pub use uuid_map_repo_sqlite::*;

mod repo_tx_sqlite;

pub use repo_tx_sqlite::*;

mod schema;

pub use schema::*;

mod util;
