use axum::extract::Query;
use axum::response::Html;

use super::dto::IndexParams;
use super::render;

pub async fn page_index(Query(params): Query<IndexParams>) -> Html<String> {
    render::index_page(params.message.as_deref())
}

pub async fn page_about() -> Html<String> {
    render::about_page()
}
