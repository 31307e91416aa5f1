#![doc = "repo-blogger-core: core pipeline library for repo-blogger."]

//! Turns a GitHub repository into a blog draft and a set of illustration
//! prompts. Network clients for the store and the blog platforms live in the
//! `repo-blogger` CLI crate; this crate only defines their traits.
//!
//! # Usage
//! Build a [`pipeline::Pipeline`] from a [`config::BloggerConfig`], a
//! [`contract::Collector`] and a [`contract::Store`], then call `run`.

pub mod analyze;
pub mod collect;
pub mod compose;
pub mod config;
pub mod contract;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod render;
