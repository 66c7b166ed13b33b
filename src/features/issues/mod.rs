//! Environmental issue reports.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/issues` | List issues, newest first |
//! | GET | `/api/issues/{id}` | Get one issue |
//! | GET | `/api/issues/nearby?lat=&lng=&radius=` | Issues within `radius` km (default 10) |
//! | GET | `/api/issues/status/{status}` | Issues in a status |
//! | POST | `/api/issues` | Report an issue (anonymous without a token) |
//! | PATCH | `/api/issues/{id}/status?status=` | Change status |
//! | DELETE | `/api/issues/{id}` | Delete an issue |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{InMemoryIssueRepository, IssueRepository, PgIssueRepository};
pub use services::IssueService;
