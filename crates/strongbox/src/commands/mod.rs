// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subcommand implementations.

pub mod check;
pub mod entry;
pub mod keygen;
pub mod user;
