//! Categories: the groupings items belong to.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/category/categories` | List categories by name |
//! | GET/POST | `/category/create` | Create form / submit |
//! | GET | `/category/{id}` | Category with its items |
//! | GET/POST | `/category/{id}/delete` | Confirm / delete (refused while items remain) |
//! | GET/POST | `/category/{id}/update` | Edit form / submit |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::CategoryService;
