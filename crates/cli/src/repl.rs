use crate::output::write_results;
use dnslookup_domain::RecordType;
use dnslookup_infrastructure::dns::IterativeResolver;
use std::io::Write;
use std::net::IpAddr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const PROMPT: &str = "DNSLOOKUP> ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lookup { name: String, record_type: RecordType },
    Trace(bool),
    Server(IpAddr),
    Dump,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid call. Format:\n\tlookup hostName [type]")]
    LookupUsage,

    #[error("Invalid query type. Must be one of:\n\tA, AAAA, NS, MX, CNAME, SOA, TYPE<n>")]
    InvalidType,

    #[error("Invalid call. Format:\n\ttrace on|off")]
    TraceUsage,

    #[error("Invalid call. Format:\n\tserver IP")]
    ServerUsage,

    #[error("Invalid root server ({0}).")]
    InvalidServer(String),

    #[error("Invalid command. Valid commands are:\n\tlookup fqdn [type]\n\ttrace on|off\n\tserver IP\n\tdump\n\tquit")]
    Unknown,
}

/// Parses one input line. `Ok(None)` for blank lines and pure comments.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.split('#').next().unwrap_or_default();
    let args: Vec<&str> = line.split_whitespace().collect();

    let Some(command) = args.first() else {
        return Ok(None);
    };

    let command = match command.to_ascii_lowercase().as_str() {
        "quit" | "exit" => Command::Quit,
        "dump" => Command::Dump,
        "server" => match args.as_slice() {
            [_, addr] => Command::Server(
                addr.parse()
                    .map_err(|e: std::net::AddrParseError| CommandError::InvalidServer(e.to_string()))?,
            ),
            _ => return Err(CommandError::ServerUsage),
        },
        "trace" => match args.as_slice() {
            [_, flag] if flag.eq_ignore_ascii_case("on") => Command::Trace(true),
            [_, flag] if flag.eq_ignore_ascii_case("off") => Command::Trace(false),
            _ => return Err(CommandError::TraceUsage),
        },
        "lookup" | "l" => match args.as_slice() {
            [_, name] => Command::Lookup {
                name: name.to_string(),
                record_type: RecordType::A,
            },
            [_, name, record_type] => Command::Lookup {
                name: name.to_string(),
                record_type: record_type
                    .parse()
                    .map_err(|_| CommandError::InvalidType)?,
            },
            _ => return Err(CommandError::LookupUsage),
        },
        _ => return Err(CommandError::Unknown),
    };

    Ok(Some(command))
}

/// Reads commands until `quit` or end of input.
pub async fn run<R, W>(
    resolver: &mut IterativeResolver,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        debug!(?command, "Command parsed");

        match command {
            Command::Quit => break,
            Command::Server(addr) => {
                resolver.set_root_server(addr);
                writeln!(out, "Root DNS server is now: {}", addr)?;
            }
            Command::Trace(on) => {
                resolver.set_verbose(on);
                writeln!(
                    out,
                    "Verbose tracing is now: {}",
                    if on { "ON" } else { "OFF" }
                )?;
            }
            Command::Lookup { name, record_type } => {
                let records = resolver.resolve(&name, record_type).await;
                write_results(&mut *out, &name, record_type, &records)?;
            }
            Command::Dump => {
                resolver.cache().purge_expired();
                let mut result = Ok(());
                resolver.dump(|key, records| {
                    if result.is_ok() {
                        result = write_results(&mut *out, &key.name, key.record_type, records);
                    }
                });
                result?;
            }
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}
