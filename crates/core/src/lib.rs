//! Core library for sitegen
//!
//! This crate implements the **Functional Core** of the sitegen application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`sitegen_core`** (this crate): Pure transformation functions with zero I/O
//! - **`sitegen`**: HTTP server, completion client, database and filesystem (the Imperative Shell)
//!
//! Every function in this crate is deterministic: the model response, the
//! project id and the file entries come in as plain data and the results go
//! out as plain data. Randomness (project ids) and persistence live in the
//! shell.
//!
//! # Module Organization
//!
//! - [`extract`]: Decode model output into file entries (marker and JSON envelope strategies)
//! - [`project`]: Project ids, validated relative paths and the final file plan
//! - [`prompt`]: System and user prompts for the completion call
//! - [`media`]: Content types for served files
//! - [`accounts`]: Signup/login form validation
//!
//! # Example Usage
//!
//! ```rust
//! use sitegen_core::extract::{extract_files, Strategy};
//! use sitegen_core::project::{plan_project, ProjectId};
//!
//! let response = "===PAGE: about.html===\n<html><head></head></html>";
//! let entries = extract_files(response, Strategy::Marker).unwrap();
//!
//! let plan = plan_project(entries, ProjectId::parse("demo").unwrap());
//! assert!(plan.get("index.html").is_some());
//! assert!(plan.get("index_preview.html").is_some());
//! ```

pub mod accounts;
pub mod extract;
pub mod media;
pub mod project;
pub mod prompt;
