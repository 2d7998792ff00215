use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Condition, LikeExpr};

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Normalize the `q` parameter: absent and empty both mean "no filter".
pub fn normalize_query(q: Option<&str>) -> Option<&str> {
    q.filter(|q| !q.is_empty())
}

/// SQL pre-filter: `name LIKE %q% OR description LIKE %q%`.
///
/// LIKE is case-insensitive on SQLite, so rows must still pass
/// [`matches_query`].
pub fn like_any<C>(columns: [C; 2], q: &str) -> Condition
where
    C: ColumnTrait,
{
    let pattern = format!("%{}%", escape_like(q));
    columns.into_iter().fold(Condition::any(), |cond, col| {
        cond.add(col.like(LikeExpr::new(pattern.clone()).escape('\\')))
    })
}

/// Case-sensitive substring match on name or description.
pub fn matches_query(name: &str, description: &str, q: &str) -> bool {
    name.contains(q) || description.contains(q)
}
