//! Client library for the Cristin research-metadata API.
//!
//! Implements the request pipeline shared by the two public operations:
//! parameter validation ([`validate`]), upstream URL construction and HTTP
//! access behind a swappable trait ([`client`]), strict decoding of the
//! Cristin wire format ([`types`]), per-item enrichment of query pages
//! ([`enrich`]) and the transformation into the outbound NVA shapes
//! ([`nva`]).

pub mod client;
pub mod enrich;
pub mod error;
pub mod nva;
pub mod types;
pub mod validate;

pub use client::{from_json, CristinApi, CristinApiClient, QueryResults, DEFAULT_BASE_URL};
pub use error::UpstreamError;
pub use validate::{Language, LookupParams, QueryParams, ValidationError};
