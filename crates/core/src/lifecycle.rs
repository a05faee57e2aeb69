// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The enquiry lifecycle controller.
//!
//! The controller owns one `EnquiryRecord` and gates every mutation of its
//! status, including the one-way promotion into an admission record. Local
//! state never changes before the remote call settles, and a settlement
//! that arrives after `discard()` is ignored rather than applied to stale
//! state.
//!
//! Operations are two-phase: `begin_*` validates and hands back a request
//! to dispatch, `settle_*` applies the service's response. The convenience
//! drivers (`set_status`, `convert`) run both phases against a service in
//! one call; the split exists so in-flight suppression and stale-result
//! discard are testable without a UI.

use crate::error::CoreError;
use crate::service::{RemoteDataService, ServiceError};
use enrol_domain::{AdmissionRecord, EnquiryId, EnquiryRecord, EnquiryStatus};

/// Settlement ticket pairing a dispatched request with the in-flight phase
/// it belongs to. A settlement presenting a ticket that no longer matches
/// is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// What the controller is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationPhase {
    Idle,
    StatusInFlight { ticket: Ticket },
    ConversionInFlight { ticket: Ticket },
}

/// Outcome of beginning a status change.
#[derive(Debug, Clone, PartialEq)]
pub enum BeginStatus {
    /// Dispatch this request to the service, then settle with its result.
    Dispatch(StatusRequest),
    /// The record is converted; the request is silently ignored.
    Terminal,
    /// The target equals the current status; nothing to do.
    Unchanged,
}

/// A validated status-change request awaiting dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRequest {
    pub enquiry_id: EnquiryId,
    pub target: EnquiryStatus,
    pub ticket: Ticket,
}

/// Result of settling a status change.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusSettlement {
    /// The service accepted the update; the controller adopted the record.
    Applied(EnquiryRecord),
    /// The service refused the update; local state is untouched.
    Failed(ServiceError),
    /// The ticket no longer matches; the result was discarded.
    Stale,
}

/// Outcome of beginning a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum BeginConversion {
    /// Dispatch this request to the service, then settle with its result.
    Dispatch(ConversionRequest),
    /// The enquiry is not approved; no network interaction takes place.
    NotEligible,
}

/// A validated conversion request awaiting dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub enquiry_id: EnquiryId,
    pub ticket: Ticket,
}

/// Result of settling a conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionSettlement {
    /// The conversion committed; the local record is now `Converted`.
    Converted(AdmissionRecord),
    /// The conversion failed; neither side changed.
    Failed(ServiceError),
    /// The ticket no longer matches; the result was discarded.
    Stale,
}

/// Outcome of a driven status change.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusOutcome {
    /// The status was updated remotely and locally.
    Updated(EnquiryRecord),
    /// The record is converted; the request was ignored.
    Terminal,
    /// The target equals the current status; nothing happened.
    Unchanged,
}

/// Outcome of a driven conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertOutcome {
    /// The enquiry was converted.
    Converted(AdmissionRecord),
    /// The enquiry is not approved; nothing happened.
    NotEligible,
}

/// Controller owning one enquiry's lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub struct EnquiryLifecycle {
    record: EnquiryRecord,
    phase: OperationPhase,
    next_ticket: u64,
}

impl EnquiryLifecycle {
    /// Creates a controller for the given record.
    #[must_use]
    pub const fn new(record: EnquiryRecord) -> Self {
        Self {
            record,
            phase: OperationPhase::Idle,
            next_ticket: 0,
        }
    }

    /// Returns the record under management.
    #[must_use]
    pub const fn record(&self) -> &EnquiryRecord {
        &self.record
    }

    /// Returns true while an operation is awaiting settlement.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        !matches!(self.phase, OperationPhase::Idle)
    }

    /// The statuses this record may currently be assigned to.
    ///
    /// Exposed so the Presentation Layer can disable illegal affordances.
    #[must_use]
    pub fn legal_targets(&self) -> Vec<EnquiryStatus> {
        EnquiryStatus::ALL
            .into_iter()
            .filter(|target| self.record.status.can_transition_to(*target))
            .collect()
    }

    /// Returns true if this record is eligible for conversion.
    #[must_use]
    pub const fn may_convert(&self) -> bool {
        self.record.status.may_convert()
    }

    fn take_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Validates a status change and moves the controller in flight.
    ///
    /// Returns `Terminal`/`Unchanged` for the silent no-op cases. Local
    /// state is not touched; the change applies at settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if another operation is in flight or the target is
    /// not a legal assignment (e.g. `Converted`).
    pub fn begin_set_status(&mut self, target: EnquiryStatus) -> Result<BeginStatus, CoreError> {
        if self.is_in_flight() {
            return Err(CoreError::OperationInFlight {
                operation: "set_status",
            });
        }

        // Terminal-state violation is a no-op, not an error: the
        // affordance is expected to be disabled upstream.
        if self.record.status.is_terminal() {
            return Ok(BeginStatus::Terminal);
        }

        if self.record.status == target {
            return Ok(BeginStatus::Unchanged);
        }

        self.record.status.validate_transition(target)?;

        let ticket: Ticket = self.take_ticket();
        self.phase = OperationPhase::StatusInFlight { ticket };

        Ok(BeginStatus::Dispatch(StatusRequest {
            enquiry_id: self.record.enquiry_id,
            target,
            ticket,
        }))
    }

    /// Settles a status change with the service's response.
    ///
    /// A mismatched ticket (the controller was discarded or has moved on)
    /// yields `Stale` and leaves state untouched.
    pub fn settle_set_status(
        &mut self,
        ticket: Ticket,
        result: Result<EnquiryRecord, ServiceError>,
    ) -> StatusSettlement {
        match self.phase {
            OperationPhase::StatusInFlight { ticket: expected } if expected == ticket => {
                self.phase = OperationPhase::Idle;
                match result {
                    Ok(record) => {
                        self.record = record.clone();
                        StatusSettlement::Applied(record)
                    }
                    Err(error) => StatusSettlement::Failed(error),
                }
            }
            _ => StatusSettlement::Stale,
        }
    }

    /// Validates a conversion and moves the controller in flight.
    ///
    /// # Errors
    ///
    /// Returns an error if another operation is in flight.
    pub fn begin_convert(&mut self) -> Result<BeginConversion, CoreError> {
        if self.is_in_flight() {
            return Err(CoreError::OperationInFlight {
                operation: "convert",
            });
        }

        // Defensive re-check of the affordance gate: anything other than
        // an approved enquiry produces no network interaction at all.
        if !self.record.status.may_convert() {
            return Ok(BeginConversion::NotEligible);
        }

        let ticket: Ticket = self.take_ticket();
        self.phase = OperationPhase::ConversionInFlight { ticket };

        Ok(BeginConversion::Dispatch(ConversionRequest {
            enquiry_id: self.record.enquiry_id,
            ticket,
        }))
    }

    /// Settles a conversion with the service's response.
    ///
    /// On success the local record becomes `Converted`; the service has
    /// already committed both sides atomically.
    pub fn settle_convert(
        &mut self,
        ticket: Ticket,
        result: Result<AdmissionRecord, ServiceError>,
    ) -> ConversionSettlement {
        match self.phase {
            OperationPhase::ConversionInFlight { ticket: expected } if expected == ticket => {
                self.phase = OperationPhase::Idle;
                match result {
                    Ok(admission) => {
                        self.record.status = EnquiryStatus::Converted;
                        ConversionSettlement::Converted(admission)
                    }
                    Err(error) => ConversionSettlement::Failed(error),
                }
            }
            _ => ConversionSettlement::Stale,
        }
    }

    /// Drives a status change against the service.
    ///
    /// # Errors
    ///
    /// Returns an error if validation refuses the change or the service
    /// rejects it; the remote failure is surfaced unchanged.
    pub fn set_status<S: RemoteDataService + ?Sized>(
        &mut self,
        service: &mut S,
        target: EnquiryStatus,
    ) -> Result<StatusOutcome, CoreError> {
        let request: StatusRequest = match self.begin_set_status(target)? {
            BeginStatus::Dispatch(request) => request,
            BeginStatus::Terminal => return Ok(StatusOutcome::Terminal),
            BeginStatus::Unchanged => return Ok(StatusOutcome::Unchanged),
        };

        let result = service.update_enquiry_status(request.enquiry_id, request.target);

        match self.settle_set_status(request.ticket, result) {
            StatusSettlement::Applied(record) => Ok(StatusOutcome::Updated(record)),
            StatusSettlement::Failed(error) => Err(CoreError::Remote(error)),
            StatusSettlement::Stale => {
                unreachable!("settlement cannot go stale within the synchronous driver")
            }
        }
    }

    /// Drives a conversion against the service.
    ///
    /// # Errors
    ///
    /// Returns an error if another operation is in flight or the service
    /// rejects the conversion.
    pub fn convert<S: RemoteDataService + ?Sized>(
        &mut self,
        service: &mut S,
    ) -> Result<ConvertOutcome, CoreError> {
        let request: ConversionRequest = match self.begin_convert()? {
            BeginConversion::Dispatch(request) => request,
            BeginConversion::NotEligible => return Ok(ConvertOutcome::NotEligible),
        };

        let result = service.convert_enquiry(request.enquiry_id);

        match self.settle_convert(request.ticket, result) {
            ConversionSettlement::Converted(admission) => Ok(ConvertOutcome::Converted(admission)),
            ConversionSettlement::Failed(error) => Err(CoreError::Remote(error)),
            ConversionSettlement::Stale => {
                unreachable!("settlement cannot go stale within the synchronous driver")
            }
        }
    }

    /// Abandons any in-flight operation.
    ///
    /// The outstanding ticket stops matching, so a settlement that arrives
    /// later is discarded instead of being applied to stale state.
    pub fn discard(&mut self) {
        self.phase = OperationPhase::Idle;
    }
}
