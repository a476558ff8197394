#![allow(dead_code)]
use dnslookup_domain::{RecordType, RecordValue, ResourceRecord};
use std::net::IpAddr;
use std::sync::Arc;

pub struct ResourceRecordBuilder {
    name: Arc<str>,
    record_type: RecordType,
    ttl: u32,
    value: RecordValue,
}

impl ResourceRecordBuilder {
    pub fn new() -> Self {
        Self {
            name: "example.com".into(),
            record_type: RecordType::A,
            ttl: 300,
            value: RecordValue::Address("192.0.2.1".parse().unwrap()),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.into();
        self
    }

    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn address(mut self, addr: &str) -> Self {
        let addr: IpAddr = addr.parse().unwrap();
        self.record_type = if addr.is_ipv4() {
            RecordType::A
        } else {
            RecordType::AAAA
        };
        self.value = RecordValue::Address(addr);
        self
    }

    pub fn cname(mut self, target: &str) -> Self {
        self.record_type = RecordType::CNAME;
        self.value = RecordValue::Name(target.into());
        self
    }

    pub fn text(mut self, record_type: RecordType, text: &str) -> Self {
        self.record_type = record_type;
        self.value = RecordValue::Text(text.to_string());
        self
    }

    pub fn build(self) -> ResourceRecord {
        ResourceRecord::new(self.name, self.record_type, self.ttl, self.value)
    }
}
