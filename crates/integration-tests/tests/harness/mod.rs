//! Shared test harness: mock upstream, test server, config builder

#![allow(dead_code)]

pub mod mock_openai;
pub mod server;
