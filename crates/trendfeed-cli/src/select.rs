//! `select` prints the keyword the trends feed would currently use.

use chrono::Utc;
use trendfeed_core::validate_category_filter;
use trendfeed_db::SelectionCriteria;

/// # Errors
///
/// Returns an error if the category is not a single token or the query fails.
pub(crate) async fn run_select(
    pool: &sqlx::PgPool,
    category: Option<&str>,
    criteria: SelectionCriteria,
) -> anyhow::Result<()> {
    let category = validate_category_filter(category)?;
    let row =
        trendfeed_db::select_top_keyword(pool, category.as_deref(), criteria, Utc::now()).await?;

    match row {
        Some(row) => {
            let summary = serde_json::json!({
                "id": row.id,
                "title": row.title,
                "categories": row.categories,
                "search_volume": row.search_volume,
                "increase_percentage": row.increase_percentage,
                "collected_at": row.collected_at,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        None => println!(
            "no keyword with volume >= {} in the last {}h",
            criteria.min_search_volume, criteria.window_hours
        ),
    }
    Ok(())
}
