//! Metro route finder server.
//!
//! Answers: "what is the cheapest way from this station to that one?" on
//! a network of lines that meet at interchange stations.

pub mod cache;
pub mod config;
pub mod domain;
pub mod graph;
pub mod metro;
pub mod network;
pub mod planner;
pub mod web;
