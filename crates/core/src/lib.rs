// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod lifecycle;
mod service;
mod wizard;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use error::CoreError;
pub use lifecycle::{
    BeginConversion, BeginStatus, ConversionRequest, ConversionSettlement, ConvertOutcome,
    EnquiryLifecycle, StatusOutcome, StatusRequest, StatusSettlement, Ticket,
};
pub use service::{RemoteDataService, ServiceError, ServiceErrorKind};
pub use wizard::{CLASS_CREATION_STEPS, DraftUpdate, ProvisioningWizard, StepDescriptor};
