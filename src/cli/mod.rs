// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Terminal front end used by the `meshship` binary

pub mod reporter;

pub use reporter::{ConsoleSink, Reporter};
