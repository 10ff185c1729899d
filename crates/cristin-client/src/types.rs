//! Cristin API wire types.
//!
//! All types model the JSON structures returned by the Cristin REST API.
//! The list endpoint returns sparse project records (id, title, url); the
//! detail endpoint fills in the rest. Both decode into [`CristinProject`],
//! with the detail-only fields optional.

use std::collections::HashMap;

use serde::Deserialize;

/// A project as returned by Cristin, sparse or full.
///
/// `cristin_project_id` is the only required field; a body without it is a
/// decode failure, not a usable record.
#[derive(Debug, Clone, Deserialize)]
pub struct CristinProject {
    pub cristin_project_id: String,
    /// Project titles keyed by language code.
    #[serde(default)]
    pub title: HashMap<String, String>,
    pub main_language: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub coordinating_institution: Option<CristinOrganization>,
    #[serde(default)]
    pub participants: Vec<CristinPerson>,
}

/// The organization behind a project: an institution, a unit within one,
/// or both.
#[derive(Debug, Clone, Deserialize)]
pub struct CristinOrganization {
    pub institution: Option<CristinInstitution>,
    pub unit: Option<CristinUnit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CristinInstitution {
    pub cristin_institution_id: Option<String>,
    /// Institution names keyed by language code.
    #[serde(default)]
    pub institution_name: HashMap<String, String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CristinUnit {
    pub cristin_unit_id: Option<String>,
    #[serde(default)]
    pub unit_name: HashMap<String, String>,
    pub url: Option<String>,
}

/// A person participating in a project, with their roles.
#[derive(Debug, Clone, Deserialize)]
pub struct CristinPerson {
    pub cristin_person_id: Option<String>,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub roles: Vec<CristinRole>,
}

/// Role code `PRO_MANAGER` marks the project manager; everyone else is a
/// participant.
#[derive(Debug, Clone, Deserialize)]
pub struct CristinRole {
    pub role_code: Option<String>,
    pub institution: Option<CristinInstitution>,
}
