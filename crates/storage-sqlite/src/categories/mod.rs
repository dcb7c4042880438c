mod model;
mod repository;

pub use model::{CategoryChangesetDB, CategoryDB};
pub use repository::CategoryRepository;
