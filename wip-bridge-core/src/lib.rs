#![doc = "wip-bridge-core: core pipeline for wip-bridge."]

//! This crate contains the data model, capability traits and run pipeline
//! that republish completed WIP todos as posts on a destination platform.
//! Destination-specific transport and signing live in the `wip-bridge` crate.
//!
//! # Usage
//! Build a [`config::BridgeConfig`], wire up implementations of the traits
//! in [`contract`] and call [`synchronise::synchronise`].

pub mod auth;
pub mod config;
pub mod contract;
pub mod error;
pub mod filter;
pub mod media;
pub mod publish;
pub mod source;
pub mod synchronise;
