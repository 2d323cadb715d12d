use crate::api::User;
use crate::app::AppState;

/// Case-insensitive match on name, email or id.
pub fn user_matches(user: &User, query_lower: &str) -> bool {
    user.name.to_lowercase().contains(query_lower)
        || user.email.to_lowercase().contains(query_lower)
        || user.id.to_lowercase().contains(query_lower)
}

/// Rebuild the visible users list from `users_all` and the current query.
pub fn apply_search(app: &mut AppState) {
    let q = app.search_query.to_lowercase();
    let view = &mut app.users;
    view.users = if q.is_empty() {
        view.users_all.clone()
    } else {
        view.users_all
            .iter()
            .filter(|u| user_matches(u, &q))
            .cloned()
            .collect()
    };
    view.selected = view.selected.min(view.users.len().saturating_sub(1));
}
