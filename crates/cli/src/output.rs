use dnslookup_domain::{RecordType, ResourceRecord};
use std::io::{self, Write};

/// Prints one line per record, labelled with the queried name and type.
/// An empty set prints a single placeholder line with ttl -1.
pub fn write_results<W: Write>(
    out: &mut W,
    name: &str,
    record_type: RecordType,
    records: &[ResourceRecord],
) -> io::Result<()> {
    let record_type = record_type.to_string();

    if records.is_empty() {
        writeln!(out, "{:<30} {:<5} {:<8} {}", name, record_type, -1, "0.0.0.0")?;
    }
    for record in records {
        writeln!(
            out,
            "{:<30} {:<5} {:<8} {}",
            name, record_type, record.ttl, record.value
        )?;
    }
    Ok(())
}
