mod category_handler;

pub use category_handler::{
    category_details, create_category, create_category_form, delete_category,
    delete_category_form, list_categories, update_category, update_category_form,
};
