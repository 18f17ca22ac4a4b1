// src/lib.rs

//! Solvebot Library
//!
//! A Slack bot for CTF events: announces new CTFd solves (plain solve,
//! first blood, rank changes) and moderates message text through an
//! external content-moderation API.

pub mod config;
pub mod error;
pub mod handler;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
