//! User accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/users` | List users (admin) |
//! | PATCH | `/api/users/{id}/role?role=` | Change a user's role (admin) |
//! | DELETE | `/api/users/{id}` | Delete a user (admin) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use services::UserService;
