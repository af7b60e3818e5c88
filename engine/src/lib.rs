//! # Sitebrand Engine
//!
//! Core library for applying branding (a site logo and a colour theme) to
//! SharePoint Online site collections and their subsites.
//!
//! ## Modules
//!
//! - [`auth`] - Azure AD app-only authentication (certificate or client secret)
//! - [`branding`] - Branding configuration and the per-site branding applicator
//! - [`common`] - Error types and the retry executor shared by every component
//! - [`discovery`] - Recursive subsite enumeration
//! - [`input`] - Reading the list of site collections from a CSV file
//! - [`orchestrator`] - The top-level processing loop and run tallies
//! - [`site`] - The site API contract and its SharePoint REST implementation
//! - [`theme`] - The fixed theme catalog and palette types

pub mod auth;
pub mod branding;
pub mod common;
pub mod discovery;
pub mod input;
pub mod orchestrator;
pub mod site;
pub mod theme;

pub use branding::{BrandingApplicator, BrandingConfig};
pub use common::{RetryPolicy, SiteApiError};
pub use orchestrator::{Orchestrator, RunResult, SiteTarget};
pub use site::{SharePointClient, SiteApi};
