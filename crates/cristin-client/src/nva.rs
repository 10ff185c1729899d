//! Outbound wire shapes and the Cristin-to-NVA transformation.
//!
//! Plain immutable records plus pure mapping functions. Fields absent in the
//! source are omitted from the serialized output rather than emitted as
//! nulls.

use std::collections::HashMap;

use reqwest::Url;
use serde::Serialize;

use crate::enrich::QueryOutcome;
use crate::types::{CristinInstitution, CristinOrganization, CristinPerson, CristinProject};
use crate::validate::{Language, QueryParams};

pub const PROJECT_TYPE: &str = "Project";
pub const PROJECT_MANAGER_TYPE: &str = "ProjectManager";
pub const PROJECT_PARTICIPANT_TYPE: &str = "ProjectParticipant";

const PROJECT_MANAGER_ROLE: &str = "PRO_MANAGER";

/// Paginated envelope for the query operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsWrapper {
    /// The upstream query URL the current page was fetched from.
    pub search_string: String,
    pub page: u32,
    pub per_page: u32,
    /// 1-based ordinal of the first hit on this page.
    pub first_record: u64,
    /// Upstream-reported total match count; omitted when upstream did not
    /// report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_results: Option<String>,
    /// Shaped hits in upstream order, possibly empty.
    pub hits: Vec<NvaProject>,
}

/// A shaped project record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvaProject {
    #[serde(rename = "type")]
    pub project_type: &'static str,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Language code of the chosen title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub alternative_titles: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinating_institution: Option<NvaOrganization>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contributors: Vec<NvaContributor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvaOrganization {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub name: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NvaContributor {
    #[serde(rename = "type")]
    pub contributor_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<NvaOrganization>,
}

/// Build the query response envelope from a finished pipeline run.
///
/// Pagination metadata comes from the request and the upstream total,
/// unchanged by how many hits were successfully enriched.
#[must_use]
pub fn shape_query_response(outcome: &QueryOutcome, params: &QueryParams) -> ProjectsWrapper {
    ProjectsWrapper {
        search_string: outcome.search_url.to_string(),
        page: params.page,
        per_page: params.results_per_page,
        first_record: u64::from(params.page - 1) * u64::from(params.results_per_page) + 1,
        total: outcome.total,
        previous_results: outcome.previous_url.as_ref().map(Url::to_string),
        next_results: outcome.next_url.as_ref().map(Url::to_string),
        hits: outcome
            .projects
            .iter()
            .map(|project| shape_project(project.record(), params.language))
            .collect(),
    }
}

/// Map one Cristin record, sparse or full, into the outbound shape.
#[must_use]
pub fn shape_project(record: &CristinProject, language: Language) -> NvaProject {
    let (title, title_language, alternative_titles) = select_title(record, language);
    NvaProject {
        project_type: PROJECT_TYPE,
        id: record.cristin_project_id.clone(),
        title,
        language: title_language,
        alternative_titles,
        start_date: record.start_date.clone(),
        end_date: record.end_date.clone(),
        status: record.status.clone(),
        coordinating_institution: record
            .coordinating_institution
            .as_ref()
            .map(shape_organization),
        contributors: record.participants.iter().map(shape_contributor).collect(),
    }
}

/// Pick the title in the requested language, falling back to the record's
/// main language and then any available entry. Whatever remains becomes the
/// alternative titles.
fn select_title(
    record: &CristinProject,
    language: Language,
) -> (Option<String>, Option<String>, HashMap<String, String>) {
    let mut titles = record.title.clone();
    let chosen = [Some(language.code().to_owned()), record.main_language.clone()]
        .into_iter()
        .flatten()
        .find(|code| titles.contains_key(code))
        .or_else(|| titles.keys().next().cloned());

    match chosen {
        Some(code) => {
            let title = titles.remove(&code);
            (title, Some(code), titles)
        }
        None => (None, None, titles),
    }
}

fn shape_organization(organization: &CristinOrganization) -> NvaOrganization {
    match (&organization.institution, &organization.unit) {
        (Some(institution), _) => shape_institution(institution),
        (None, Some(unit)) => NvaOrganization {
            id: unit.url.clone(),
            name: unit.unit_name.clone(),
        },
        (None, None) => NvaOrganization {
            id: None,
            name: HashMap::new(),
        },
    }
}

fn shape_institution(institution: &CristinInstitution) -> NvaOrganization {
    NvaOrganization {
        id: institution.url.clone(),
        name: institution.institution_name.clone(),
    }
}

fn shape_contributor(person: &CristinPerson) -> NvaContributor {
    let is_manager = person
        .roles
        .iter()
        .any(|role| role.role_code.as_deref() == Some(PROJECT_MANAGER_ROLE));
    let affiliation = person
        .roles
        .iter()
        .find_map(|role| role.institution.as_ref())
        .map(shape_institution);

    NvaContributor {
        contributor_type: if is_manager {
            PROJECT_MANAGER_TYPE
        } else {
            PROJECT_PARTICIPANT_TYPE
        },
        first_name: person.first_name.clone(),
        last_name: person.surname.clone(),
        affiliation,
    }
}
