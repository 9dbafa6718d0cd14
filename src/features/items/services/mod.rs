mod item_service;

pub use item_service::ItemService;
