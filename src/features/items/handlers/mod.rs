mod item_handler;

pub use item_handler::{
    create_item, create_item_form, delete_item, delete_item_form, item_details, list_items,
    update_item, update_item_form,
};
