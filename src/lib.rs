//! SafeGuard scam analysis service.
//!
//! Validates user messages, hands them to a [`classifier::Classifier`] and
//! renders the verdict together with a downloadable plain-text report.
//! The form and result logic in [`controller`] only talks to the page
//! through the traits in [`view`], so it runs the same against the
//! server-rendered pages in [`pages`] and against test doubles.

pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod models;
pub mod notice;
pub mod pages;
pub mod report;
pub mod risk;
pub mod safe_browsing;
pub mod samples;
pub mod validation;
pub mod view;
pub mod web;
