// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pipeline module - staged conversion of a loaded model into artifacts

mod convert;
mod shipper;

pub use convert::{convert, OutputEdge, OutputFace, OutputModel};
pub use shipper::{validate, ConversionResult, ModelShipper, Stage};
