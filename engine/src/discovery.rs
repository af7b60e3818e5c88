use crate::common::{RetryPolicy, execute_with_retry};
use crate::site::SiteApi;

/// Lists every subsite below a site collection, at any depth.
///
/// Discovery problems are logged and reported as an empty list so the site
/// collection itself can still be branded. The API is always left
/// disconnected.
pub async fn list_all_subsites<A: SiteApi + ?Sized>(
    api: &A,
    site_collection_url: &str,
    retry: &RetryPolicy,
) -> Vec<String> {
    log::info!("Discovering subsites of {site_collection_url}");

    if let Err(e) =
        execute_with_retry("connect", retry, move || api.connect(site_collection_url)).await
    {
        log::error!("Failed to connect to {site_collection_url} for subsite discovery: {e}");
        api.disconnect().await;
        return Vec::new();
    }

    let subsites = match execute_with_retry("list_subsites", retry, move || api.list_subsites())
        .await
    {
        Ok(subsites) => {
            log::info!(
                "Found {} subsite(s) under {site_collection_url}",
                subsites.len()
            );
            subsites
        }
        Err(e) => {
            log::error!("Failed to list subsites of {site_collection_url}: {e}");
            Vec::new()
        }
    };

    api.disconnect().await;
    subsites
}
