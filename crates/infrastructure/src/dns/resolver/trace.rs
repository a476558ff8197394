//! Human-readable trace of each server contact, emitted only while the
//! resolver is in verbose mode.

use crate::dns::codec::{DecodedMessage, Section};
use dnslookup_domain::QueryKey;
use std::net::SocketAddr;
use tracing::info;

pub const TRACE_TARGET: &str = "dnslookup::trace";

pub(super) fn query_sent(verbose: bool, id: u16, key: &QueryKey, server: SocketAddr) {
    if verbose {
        info!(
            target: TRACE_TARGET,
            "Query ID     {} {}  {} --> {}",
            id,
            key.name,
            key.record_type,
            server.ip()
        );
    }
}

pub(super) fn response_received(verbose: bool, id: u16, authoritative: bool) {
    if verbose {
        info!(
            target: TRACE_TARGET,
            "Response ID: {} Authoritative = {}", id, authoritative
        );
    }
}

pub(super) fn message_records(verbose: bool, message: &DecodedMessage) {
    if !verbose {
        return;
    }

    let counts = [
        (Section::Answer, message.header.ancount),
        (Section::Authority, message.header.nscount),
        (Section::Additional, message.header.arcount),
    ];
    for (section, count) in counts {
        info!(target: TRACE_TARGET, "  {} ({})", section, count);
        for record in message.section(section) {
            info!(target: TRACE_TARGET, "       {}", record);
        }
    }
}
