mod category_service;

pub use category_service::{
    CategoryService, CategoryWithItems, CreateCategoryOutcome, DeleteCategoryOutcome,
};
