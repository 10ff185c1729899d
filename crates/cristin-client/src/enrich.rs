//! The request pipelines: title query with per-item enrichment, and single
//! project lookup.
//!
//! The two paths deliberately handle detail-fetch failures differently. On
//! the query path an enrichment failure only costs that hit its detail
//! fields; on the lookup path the detail fetch *is* the request, so every
//! failure is fatal. Do not unify the two policies.

use futures::future::join_all;
use reqwest::Url;
use tracing::warn;

use crate::client::{from_json, CristinApi};
use crate::error::UpstreamError;
use crate::types::CristinProject;
use crate::validate::{Language, LookupParams, QueryParams};

/// One query hit: the summary record from the list endpoint, plus the full
/// record when the detail fetch succeeded.
#[derive(Debug, Clone)]
pub struct EnrichedProject {
    pub summary: CristinProject,
    pub detail: Option<CristinProject>,
}

impl EnrichedProject {
    /// The richest record available for shaping.
    #[must_use]
    pub fn record(&self) -> &CristinProject {
        self.detail.as_ref().unwrap_or(&self.summary)
    }
}

/// Everything the shaper needs to build a query response envelope.
#[derive(Debug)]
pub struct QueryOutcome {
    /// The upstream URL the page was fetched from.
    pub search_url: Url,
    /// Upstream URL of the previous page, when there is one.
    pub previous_url: Option<Url>,
    /// Upstream URL of the next page, when the reported total proves more
    /// pages exist.
    pub next_url: Option<Url>,
    /// Upstream-reported total match count, when the header was present.
    pub total: Option<u64>,
    /// Hits in upstream order.
    pub projects: Vec<EnrichedProject>,
}

/// Run the query pipeline: build the list URL, fetch and decode the page,
/// then try to enrich every hit with a concurrent detail fetch.
///
/// The primary fetch and decode are fail-fast. Enrichment failures are
/// absorbed per item: the hit keeps its summary data, a warning is logged,
/// and the page is still returned complete and in upstream order.
///
/// # Errors
///
/// Returns [`UpstreamError::Url`] when a URL cannot be built, or the fetch
/// and decode errors of the primary list call. Enrichment never errors.
pub async fn query_and_enrich<C>(
    client: &C,
    params: &QueryParams,
) -> Result<QueryOutcome, UpstreamError>
where
    C: CristinApi + ?Sized,
{
    let search_url = client.query_projects_url(params)?;
    let results = client.fetch_query_results(&search_url).await?;
    let summaries: Vec<CristinProject> = from_json(&results.body, "project query")?;

    let language = params.language;
    let projects = join_all(summaries.into_iter().map(|summary| async move {
        let detail = enrich_one(client, &summary, language).await;
        EnrichedProject { summary, detail }
    }))
    .await;

    let previous_url = if params.page > 1 {
        Some(client.query_projects_url(&QueryParams {
            page: params.page - 1,
            ..params.clone()
        })?)
    } else {
        None
    };
    let next_url = match results.total_count {
        Some(total)
            if u64::from(params.page) * u64::from(params.results_per_page) < total =>
        {
            Some(client.query_projects_url(&QueryParams {
                page: params.page + 1,
                ..params.clone()
            })?)
        }
        _ => None,
    };

    Ok(QueryOutcome {
        search_url,
        previous_url,
        next_url,
        total: results.total_count,
        projects,
    })
}

/// Try to fetch the full record for one summary. Any failure is absorbed
/// here and only reported through the log.
async fn enrich_one<C>(
    client: &C,
    summary: &CristinProject,
    language: Language,
) -> Option<CristinProject>
where
    C: CristinApi + ?Sized,
{
    let id: u64 = match summary.cristin_project_id.parse() {
        Ok(id) => id,
        Err(_) => {
            warn!(
                project_id = %summary.cristin_project_id,
                "skipping enrichment: project id is not numeric"
            );
            return None;
        }
    };

    let url = match client.get_project_url(id, language) {
        Ok(url) => url,
        Err(e) => {
            warn!(project_id = id, error = %e, "skipping enrichment: detail url construction failed");
            return None;
        }
    };

    let body = match client.fetch_project(&url).await {
        Ok(body) => body,
        Err(e) => {
            warn!(project_id = id, error = %e, "enrichment fetch failed, keeping summary data");
            return None;
        }
    };

    match from_json(&body, "project detail") {
        Ok(detail) => Some(detail),
        Err(e) => {
            warn!(project_id = id, error = %e, "enrichment decode failed, keeping summary data");
            None
        }
    }
}

/// Fetch and decode one project for the lookup operation.
///
/// # Errors
///
/// Every failure is fatal here: [`UpstreamError::NotFound`] for an upstream
/// 404, otherwise the URL, fetch or decode error.
pub async fn get_project<C>(
    client: &C,
    params: &LookupParams,
) -> Result<CristinProject, UpstreamError>
where
    C: CristinApi + ?Sized,
{
    let url = client.get_project_url(params.id, params.language)?;
    let body = client.fetch_project(&url).await?;
    from_json(&body, "project detail")
}
