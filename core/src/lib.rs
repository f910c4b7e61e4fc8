//! tmdb-proxy Core Library
//! Forwards a fixed set of movie metadata routes to the TMDB API

pub mod config;
pub mod error;
pub mod proxy;
