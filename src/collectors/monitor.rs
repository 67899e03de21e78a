use crate::config::MonitorConfig;
use crate::error::{FetchError, FetchResult};
use std::io::{Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, warn};

/// Ask the monitoring server for the last status log of `<host>.<test>`.
pub fn query(cfg: &MonitorConfig, host: &str, test: &str) -> FetchResult<String> {
    let addr_str = format!("{}:{}", cfg.host, cfg.port);
    let timeout  = Duration::from_secs(cfg.timeout_secs.max(1));

    let addr = addr_str
        .to_socket_addrs()
        .map_err(|source| FetchError::Connect { addr: addr_str.clone(), source })?
        .next()
        .ok_or_else(|| FetchError::Connect {
            addr:   addr_str.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no address"),
        })?;

    let mut sock = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|source| FetchError::Connect { addr: addr_str.clone(), source })?;
    sock.set_read_timeout(Some(timeout))?;
    sock.set_write_timeout(Some(timeout))?;

    sock.write_all(format!("xymondlog {}.{}", host, test).as_bytes())?;
    sock.shutdown(Shutdown::Write)?;

    let mut buf = Vec::new();
    sock.read_to_end(&mut buf)?;
    debug!(host, test, bytes = buf.len(), "monitor log received");

    Ok(clean_markup(&String::from_utf8_lossy(&buf)))
}

/// Like `query`, but a failure only costs the fields that depend on it.
pub fn query_or_empty(cfg: &MonitorConfig, host: &str, test: &str) -> String {
    match query(cfg, host, test) {
        Ok(text) => text,
        Err(e) => {
            warn!(host, test, error = %e, "monitor query failed");
            String::new()
        }
    }
}

const TAGS: [&str; 9] = [
    "<B>", "</B>", "<H3>", "</H3>", "<PRE>", "</PRE>",
    "<FONT color=grey>", "<FONT color=yellow>", "</FONT>",
];
const COLOURS: [&str; 5] = ["green", "red", "yellow", "blu", "clear"];

/// Strip the HTML the monitoring server embeds in status logs and turn
/// `&red`-style colour markers into plain words.
pub fn clean_markup(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n");
    for tag in TAGS {
        out = out.replace(tag, "");
    }
    for colour in COLOURS {
        out = out.replace(&format!("&{}", colour), colour);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn markup_is_removed() {
        let raw = "<H3>&red Virtual Disk 0 (RAID-5) is <B>Degraded</B></H3>\r\n<PRE>&green ok</PRE>";
        assert_eq!(clean_markup(raw), "red Virtual Disk 0 (RAID-5) is Degraded\ngreen ok");
    }

    #[test]
    fn query_sends_log_request_and_reads_to_eof() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut req = String::new();
            conn.read_to_string(&mut req).unwrap();
            conn.write_all(b"prx11a|hw-disk|<B>&green</B>|\n").unwrap();
            req
        });

        let cfg = MonitorConfig { host: "127.0.0.1".into(), port, timeout_secs: 5 };
        let text = query(&cfg, "prx11a", "hw-disk").unwrap();
        assert_eq!(text, "prx11a|hw-disk|green|\n");
        assert_eq!(server.join().unwrap(), "xymondlog prx11a.hw-disk");
    }

    #[test]
    fn refused_connection_degrades_to_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let cfg = MonitorConfig { host: "127.0.0.1".into(), port, timeout_secs: 1 };
        assert!(matches!(query(&cfg, "h", "hinv"), Err(FetchError::Connect { .. })));
        assert_eq!(query_or_empty(&cfg, "h", "hinv"), "");
    }
}
