// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fatal-check helpers for the executables.
//!
//! The tutorial treats every middleware failure as unrecoverable: the
//! failing operation is printed to stderr and the process exits with
//! status 1.

use crate::error::{ChatError, ChatResult};

/// DDS return-code name for a chatdds error.
pub fn error_name(err: &chatdds::Error) -> &'static str {
    use chatdds::Error;
    match err {
        Error::InvalidQos => "DDS_RETCODE_INCONSISTENT_POLICY",
        Error::InvalidDomainId(_) | Error::BadParameter(_) => "DDS_RETCODE_BAD_PARAMETER",
        Error::PreconditionNotMet(_) => "DDS_RETCODE_PRECONDITION_NOT_MET",
        Error::AlreadyDeleted => "DDS_RETCODE_ALREADY_DELETED",
        Error::ResourceLimitExceeded(_) => "DDS_RETCODE_OUT_OF_RESOURCES",
        Error::WouldBlock => "DDS_RETCODE_TIMEOUT",
        Error::IoError(_)
        | Error::BindFailed(_)
        | Error::MulticastJoinFailed(_)
        | Error::SendFailed(_)
        | Error::SerializationError(_)
        | Error::BufferTooSmall => "DDS_RETCODE_ERROR",
    }
}

/// `Error in <info>: <NAME> (<detail>)`
pub fn status_message(info: &str, err: &chatdds::Error) -> String {
    format!("Error in {}: {} ({})", info, error_name(err), err)
}

/// `Error in <info>: Creation failed: invalid handle`
pub fn handle_message(info: &str) -> String {
    format!("Error in {}: Creation failed: invalid handle", info)
}

/// One-line report for any chat error.
pub fn describe(err: &ChatError) -> String {
    match err {
        ChatError::Middleware { operation, source } => status_message(operation, source),
        ChatError::NullHandle { operation } => handle_message(operation),
        ChatError::Config(detail) => format!("Error in configuration: {}", detail),
        ChatError::Io(e) => format!("Error in console output: {}", e),
    }
}

/// Return the value or terminate the process with a status report.
pub fn check_status<T>(result: chatdds::Result<T>, info: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => fail(status_message(info, &err)),
    }
}

/// Return the handle or terminate the process if it is missing.
pub fn check_handle<T>(handle: Option<T>, info: &str) -> T {
    match handle {
        Some(value) => value,
        None => fail(handle_message(info)),
    }
}

/// Unwrap a chat session result, terminating the process on error.
pub fn check_chat<T>(result: ChatResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(ChatError::Middleware { operation, source }) => check_status(Err(source), operation),
        Err(ChatError::NullHandle { operation }) => check_handle(None, operation),
        Err(other) => fail(describe(&other)),
    }
}

fn fail(message: String) -> ! {
    tracing::error!("{}", message);
    eprintln!("{}", message);
    std::process::exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_format() {
        let err = chatdds::Error::PreconditionNotMet("topic still has 1 endpoint(s)".into());
        assert_eq!(
            status_message("DDS::DomainParticipant::delete_topic", &err),
            "Error in DDS::DomainParticipant::delete_topic: DDS_RETCODE_PRECONDITION_NOT_MET \
             (Precondition not met: topic still has 1 endpoint(s))"
        );
    }

    #[test]
    fn test_describe_covers_every_kind() {
        let null = ChatError::NullHandle {
            operation: "DDS::Subscriber::create_datareader",
        };
        assert_eq!(
            describe(&null),
            "Error in DDS::Subscriber::create_datareader: Creation failed: invalid handle"
        );
        let config = ChatError::Config("CHAT_DOMAIN_ID=abc".into());
        assert_eq!(
            describe(&config),
            "Error in configuration: CHAT_DOMAIN_ID=abc"
        );
    }

    #[test]
    fn test_error_names() {
        assert_eq!(
            error_name(&chatdds::Error::InvalidDomainId(300)),
            "DDS_RETCODE_BAD_PARAMETER"
        );
        assert_eq!(
            error_name(&chatdds::Error::AlreadyDeleted),
            "DDS_RETCODE_ALREADY_DELETED"
        );
        assert_eq!(
            error_name(&chatdds::Error::ResourceLimitExceeded("max_instances".into())),
            "DDS_RETCODE_OUT_OF_RESOURCES"
        );
        assert_eq!(error_name(&chatdds::Error::BufferTooSmall), "DDS_RETCODE_ERROR");
    }

    #[test]
    fn test_success_paths_pass_values_through() {
        assert_eq!(check_status(Ok(4), "unused"), 4);
        assert_eq!(check_handle(Some("h"), "unused"), "h");
        assert_eq!(check_chat::<u8>(Ok(9)), 9);
    }
}
