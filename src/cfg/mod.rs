//! Configuration loading and logger setup.

// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Device and pass-through configuration.
pub mod config;
/// Logger initialization.
pub mod logger;
