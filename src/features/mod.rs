pub mod categories;
pub mod items;
pub mod rate_limits;
