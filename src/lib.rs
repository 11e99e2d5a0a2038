//! Kubetools - load, validate and inspect Kubernetes Deployment manifests.
//!
//! Manifests are multi-document YAML (or JSON) files. Every `Deployment`
//! document is parsed into a typed record that keeps unknown keys, so it can
//! be written back without losing anything. Other kinds are skipped.
//!
//! # Modules
//!
//! - [`domain`] - Deployment record, image references, kubetools labels, naming rules
//! - [`manifest`] - Loading files, directories and stdin into a [`manifest::ManifestSet`]
//! - [`validate`] - Rules run over a set, producing a [`validate::Report`]
//! - [`config`] - Settings file, logging and validation policy
//! - [`error`] - Error types for the crate
//! - [`cli`] - The `kubetools` command line
//!
//! # Example
//!
//! ```no_run
//! use kubetools::config::ValidationPolicy;
//! use kubetools::manifest::ManifestSet;
//! use kubetools::validate::Validator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let set = ManifestSet::load(&["k8s/"])?;
//!     let policy = ValidationPolicy::default();
//!     let report = Validator::new(&policy).run(&set);
//!     for finding in report.findings() {
//!         println!("{finding}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod validate;
