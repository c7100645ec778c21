use crate::aur_api::{ HttpResponse, Transport };
use crate::error::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::sync::{ Arc, Mutex };

/// Transport serving canned responses keyed by exact URL. Unknown URLs get a 404.
#[derive(Default)]
pub struct CannedTransport {
    responses: HashMap<String, (u16, Vec<u8>)>,
    requested: RefCell<Vec<String>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(url.to_string(), (status, body.into()));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Transport for CannedTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requested.borrow_mut().push(url.to_string());
        let (status, body) = self.responses
            .get(url)
            .cloned()
            .unwrap_or((404, b"not found".to_vec()));
        let reason = if status == 200 { "OK" } else { "Not Found" };
        Ok(HttpResponse { status, reason: reason.to_string(), body })
    }
}

/// Build a gzip-compressed tarball. Paths ending in `/` become directory entries.
///
/// Names are written into the header verbatim so hostile paths such as `../x`
/// can be produced.
pub fn tarball(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        let name = path.as_bytes();
        header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        if path.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
        } else {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(data.len() as u64);
        }
        header.set_cksum();
        builder.append(&header, data.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber and return its result along with everything logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
