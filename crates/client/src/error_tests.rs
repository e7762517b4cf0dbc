// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn connection_error_names_the_cause() {
    let err = SyncError::Connection("could not establish subscription".into());
    assert_eq!(
        err.to_string(),
        "connection error: could not establish subscription"
    );
}

#[test]
fn transport_errors_convert_transparently() {
    let err: SyncError = TransportError::ConnectionClosed.into();
    assert!(matches!(err, SyncError::Transport(_)));
    assert_eq!(err.to_string(), "connection closed");
}

#[test]
fn decode_errors_keep_core_message() {
    let err: SyncError = docsync_core::Error::MalformedEvent("missing transactionId".into()).into();
    assert!(err.to_string().contains("missing transactionId"));
}

#[test]
fn invalid_param_has_hint() {
    let err = Error::InvalidParam("novalue".into());
    let message = err.to_string();
    assert!(message.contains("novalue"));
    assert!(message.contains("hint:"));
}
