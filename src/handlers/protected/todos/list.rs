use axum::extract::{rejection::QueryRejection, Query, State};

use crate::database::models::{Todo, TodoFilter};
use crate::handlers::QueryParams;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// `true`/`false` narrow the listing; anything else leaves it unfiltered.
fn completed_filter(query: &QueryParams) -> Option<bool> {
    match query.first("completed") {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// GET /todos - admins see every row, users only their own
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<QueryParams>, QueryRejection>,
) -> ApiResult<Vec<Todo>> {
    let Query(query) = query?;

    let filter = TodoFilter {
        owner: (!user.is_admin()).then(|| user.user_id()),
        completed: completed_filter(&query),
    };

    let todos = state.store.list_todos(filter).await?;
    Ok(ApiResponse::success(todos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_filter_is_lenient() {
        let q = |v: &str| completed_filter(&QueryParams(vec![("completed".into(), v.into())]));
        assert_eq!(q("true"), Some(true));
        assert_eq!(q("false"), Some(false));
        assert_eq!(q("yes"), None);
        assert_eq!(completed_filter(&QueryParams::default()), None);
    }
}
