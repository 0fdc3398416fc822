//! Menu Repositories

mod categories;
mod items;

pub(crate) use categories::PgCategoriesRepository;
pub(crate) use items::{PgMenuItemsRepository, try_get_cents, try_into_cents};
