use anyhow::Result;
use ireno_core::backend::{SearchType, SopSearchRequest};

use crate::bootstrap::App;
use crate::render;

pub async fn run(app: &App, query: &str, advanced: bool, max_results: usize) -> Result<()> {
    let search_type = if advanced {
        SearchType::Advanced
    } else {
        SearchType::Basic
    };
    let request = SopSearchRequest::new(query)
        .with_search_type(search_type)
        .with_max_results(max_results);

    let response = app.service.search_documents(&request).await?;
    render::print_search_results(&response);
    Ok(())
}
