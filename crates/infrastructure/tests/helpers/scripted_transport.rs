#![allow(dead_code)]
use async_trait::async_trait;
use dnslookup_domain::{DomainError, QueryKey, RecordType};
use dnslookup_infrastructure::dns::codec::{decode_question, HEADER_LEN};
use dnslookup_infrastructure::dns::DnsTransport;
use std::collections::{HashMap, VecDeque};
use std::net::{IpAddr, SocketAddr};
use std::sync::Mutex;
use std::time::Duration;

/// What the fake server does with one query.
#[derive(Clone)]
pub enum Step {
    /// Reply with these bytes under the query's transaction id.
    Reply(Vec<u8>),
    /// Reply once under a wrong id, then with these bytes.
    StaleThenReply(Vec<u8>),
    /// Stay silent.
    Drop,
}

/// In-memory transport that answers from a script keyed by
/// (server, question) and records every query it is sent.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<HashMap<(IpAddr, QueryKey), VecDeque<Step>>>,
    pending: Mutex<VecDeque<Vec<u8>>>,
    contacts: Mutex<Vec<(IpAddr, QueryKey)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `steps` for queries of `name`/`record_type` sent to `server`.
    /// Once the queue is drained the server stays silent.
    pub fn on(&self, server: &str, name: &str, record_type: RecordType, steps: Vec<Step>) {
        let key = (server.parse().unwrap(), QueryKey::new(name, record_type));
        self.script
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .extend(steps);
    }

    pub fn reply(&self, server: &str, name: &str, record_type: RecordType, bytes: Vec<u8>) {
        self.on(server, name, record_type, vec![Step::Reply(bytes)]);
    }

    pub fn contacts(&self) -> Vec<(IpAddr, QueryKey)> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn contact_count(&self) -> usize {
        self.contacts.lock().unwrap().len()
    }

    pub fn servers_contacted(&self) -> Vec<IpAddr> {
        self.contacts().into_iter().map(|(server, _)| server).collect()
    }
}

fn with_id(mut bytes: Vec<u8>, id: u16) -> Vec<u8> {
    bytes[0..2].copy_from_slice(&id.to_be_bytes());
    bytes
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn send(&self, message_bytes: &[u8], server: SocketAddr) -> Result<(), DomainError> {
        let id = u16::from_be_bytes([message_bytes[0], message_bytes[1]]);
        let (question, _) = decode_question(message_bytes, HEADER_LEN)?;
        self.contacts
            .lock()
            .unwrap()
            .push((server.ip(), question.clone()));

        let step = self
            .script
            .lock()
            .unwrap()
            .get_mut(&(server.ip(), question))
            .and_then(|steps| steps.pop_front());

        let mut pending = self.pending.lock().unwrap();
        match step {
            Some(Step::Reply(bytes)) => pending.push_back(with_id(bytes, id)),
            Some(Step::StaleThenReply(bytes)) => {
                pending.push_back(with_id(bytes.clone(), id.wrapping_add(1)));
                pending.push_back(with_id(bytes, id));
            }
            Some(Step::Drop) | None => {}
        }
        Ok(())
    }

    async fn receive(&self, _timeout: Duration) -> Result<Vec<u8>, DomainError> {
        self.pending
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(DomainError::TransportTimeout {
                server: "scripted".to_string(),
            })
    }
}
