mod issue_dto;

pub use issue_dto::*;
