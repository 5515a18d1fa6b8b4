// repo

mod user_repo;
mod uuid_map_repo;

mod repo_tx;

pub use user_repo::*;
pub use uuid_map_repo::*;

pub use repo_tx::*;
