//! Inventory items, each belonging to exactly one category.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/item/items` | List items by name with their categories |
//! | GET/POST | `/item/create` | Create form / submit |
//! | GET | `/item/{id}` | Item detail |
//! | GET/POST | `/item/{id}/delete` | Confirm / delete |
//! | GET/POST | `/item/{id}/update` | Edit form / submit |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::ItemService;
