pub mod issue_handler;

pub use issue_handler::{
    __path_create_issue, __path_delete_issue, __path_get_issue, __path_issues_by_status,
    __path_list_issues, __path_nearby_issues, __path_update_issue_status, create_issue,
    delete_issue, get_issue, issues_by_status, list_issues, nearby_issues, update_issue_status,
};
