mod item;

pub use item::{Item, ItemSummary, ItemWithCategory, NewItem};
