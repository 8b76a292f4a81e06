// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portfolio Server - Blog & Project Portfolio Backend
//!
//! A public read API for articles and projects with an authenticated write
//! surface, plus the client-side session machinery that talks to it.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer-token authorization gate (RS256 JWT)
//! - `storage` - Embedded content database (redb)
//! - `session` - Client session store, identity service and content client

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod server;
pub mod session;
pub mod state;
pub mod storage;
