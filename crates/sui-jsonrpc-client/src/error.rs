// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use sui_jsonrpc_types::base_types::ObjectID;
use thiserror::Error;

use crate::batch::ElementError;
use crate::transport::TransportError;

pub type SuiRpcResult<T = ()> = Result<T, Error>;

/// Stage of the owned-object pipeline an error came out of.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FetchPhase {
    Listing,
    Fetch,
    Extraction,
}

impl Display for FetchPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchPhase::Listing => f.write_str("listing"),
            FetchPhase::Fetch => f.write_str("fetch"),
            FetchPhase::Extraction => f.write_str("extraction"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("Call to {method} failed: {source}")]
    Element {
        method: String,
        #[source]
        source: ElementError,
    },
    #[error(transparent)]
    JsonSerializationError(#[from] serde_json::Error),
    #[error("Object {object_id} has no balance field")]
    MissingBalanceField { object_id: ObjectID },
    #[error("Object {object_id} has an invalid balance {value:?}: {reason}")]
    InvalidBalanceEncoding {
        object_id: ObjectID,
        value: String,
        reason: String,
    },
    #[error("Object {object_id} has unexpected field shape: {reason}")]
    UnexpectedFieldShape { object_id: ObjectID, reason: String },
    #[error("Owned object {phase} failed: {source}")]
    Phase {
        phase: FetchPhase,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn in_phase(self, phase: FetchPhase) -> Self {
        Error::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// The pipeline phase this error was raised in, if any.
    pub fn phase(&self) -> Option<FetchPhase> {
        match self {
            Error::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Strips any phase annotation.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Phase { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "unit_tests/error_tests.rs"]
mod error_tests;
