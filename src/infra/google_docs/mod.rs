// =============================================================================
// GOOGLE DOCS MODULE
// =============================================================================
//
// HTTP implementation of the core `DocumentsApi` trait.
//
// **Architecture:**
// This module lives in the infra layer because it handles external I/O
// (HTTP requests to Google APIs). The core layer only knows it can ask for
// "where does this document end" and "apply this append plan".

pub mod google_docs_client;

pub use google_docs_client::GoogleDocsClient;
