/// Landing page for categories; `/` redirects here
pub const CATEGORY_LIST_PATH: &str = "/category/categories";

/// Landing page for items
pub const ITEM_LIST_PATH: &str = "/item/items";
