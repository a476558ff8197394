#![allow(dead_code)]
use dnslookup_domain::{QueryKey, RecordType, RecordValue, ResourceRecord};
use dnslookup_infrastructure::dns::codec::{encode_query, CLASS_IN};
use std::net::IpAddr;

/// Builds wire-format responses. Owner and target names are written
/// uncompressed; the transaction id is patched in by the transport.
pub struct ResponseBuilder {
    question: QueryKey,
    authoritative: bool,
    truncated: bool,
    rcode: u8,
    answers: Vec<ResourceRecord>,
    authority: Vec<ResourceRecord>,
    additional: Vec<ResourceRecord>,
}

impl ResponseBuilder {
    pub fn new(name: &str, record_type: RecordType) -> Self {
        Self {
            question: QueryKey::new(name, record_type),
            authoritative: false,
            truncated: false,
            rcode: 0,
            answers: Vec::new(),
            authority: Vec::new(),
            additional: Vec::new(),
        }
    }

    pub fn authoritative(mut self) -> Self {
        self.authoritative = true;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }

    pub fn rcode(mut self, rcode: u8) -> Self {
        self.rcode = rcode;
        self
    }

    pub fn answer_a(mut self, name: &str, ttl: u32, addr: &str) -> Self {
        self.answers
            .push(ResourceRecord::address(name, ttl, addr.parse::<IpAddr>().unwrap()));
        self
    }

    pub fn answer_cname(mut self, alias: &str, ttl: u32, target: &str) -> Self {
        self.answers
            .push(ResourceRecord::canonical_name(alias, ttl, target));
        self
    }

    pub fn answer_ns(mut self, zone: &str, ttl: u32, host: &str) -> Self {
        self.answers
            .push(ResourceRecord::name_server(zone, ttl, host));
        self
    }

    pub fn referral(mut self, zone: &str, ttl: u32, host: &str) -> Self {
        self.authority
            .push(ResourceRecord::name_server(zone, ttl, host));
        self
    }

    pub fn glue(mut self, host: &str, ttl: u32, addr: &str) -> Self {
        self.additional
            .push(ResourceRecord::address(host, ttl, addr.parse::<IpAddr>().unwrap()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = encode_query(&self.question.name, self.question.record_type, 0).unwrap();

        let mut flags = 0x80u8;
        if self.authoritative {
            flags |= 0x04;
        }
        if self.truncated {
            flags |= 0x02;
        }
        buf[2] = flags;
        buf[3] = self.rcode & 0x0F;
        buf[6..8].copy_from_slice(&(self.answers.len() as u16).to_be_bytes());
        buf[8..10].copy_from_slice(&(self.authority.len() as u16).to_be_bytes());
        buf[10..12].copy_from_slice(&(self.additional.len() as u16).to_be_bytes());

        for record in self
            .answers
            .iter()
            .chain(&self.authority)
            .chain(&self.additional)
        {
            write_record(&mut buf, record);
        }
        buf
    }
}

fn write_name(buf: &mut Vec<u8>, name: &str) {
    for label in name.split('.').filter(|l| !l.is_empty()) {
        buf.push(label.len() as u8);
        buf.extend_from_slice(label.as_bytes());
    }
    buf.push(0);
}

fn write_record(buf: &mut Vec<u8>, record: &ResourceRecord) {
    write_name(buf, &record.name);
    buf.extend_from_slice(&record.record_type.to_u16().to_be_bytes());
    buf.extend_from_slice(&CLASS_IN.to_be_bytes());
    buf.extend_from_slice(&record.ttl.to_be_bytes());

    let mut rdata = Vec::new();
    match &record.value {
        RecordValue::Address(IpAddr::V4(v4)) => rdata.extend_from_slice(&v4.octets()),
        RecordValue::Address(IpAddr::V6(v6)) => rdata.extend_from_slice(&v6.octets()),
        RecordValue::Name(name) => write_name(&mut rdata, name),
        other => panic!("unsupported test rdata: {:?}", other),
    }
    buf.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
    buf.extend_from_slice(&rdata);
}
