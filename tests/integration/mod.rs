//! Integration tests for the organizer

mod auth_session;
mod cli_contracts;
mod repository_store;
mod subtree_properties;
mod support;
