mod issue;

pub use issue::{CreateIssue, Issue, IssueCategory, IssueSeverity, IssueStatus};
