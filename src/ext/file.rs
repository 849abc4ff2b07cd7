//! `file` and `reader` value adapters
//!
//! A field of type [`File`] holds the content of the file named on the
//! command line; a [`Reader`] keeps the name and opens it on first read.
//! `-` stands for stdin in both. A reader also accepts `http://` and
//! `https://` URLs.

use crate::error::{CliError, CliResult};
use crate::flag::FieldKind;
use crate::parser::FlagParser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::io::{self, Read};
use tracing::debug;

/// Name meaning stdin
pub const STDIN_NAME: &str = "-";

/// Whether `name` is an http(s) URL rather than a path
pub fn is_url(name: &str) -> bool {
    name.starts_with("http://") || name.starts_with("https://")
}

fn is_loopback(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(|host| matches!(host, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}

fn open_remote(url: &str) -> io::Result<Box<dyn Read>> {
    debug!(target: "argbind::ext", url, "opening remote reader");
    let mut builder = reqwest::blocking::Client::builder();
    if is_loopback(url) {
        builder = builder.no_proxy();
    }
    let response = builder
        .build()
        .and_then(|client| client.get(url).send())
        .and_then(|response| response.error_for_status())
        .map_err(io::Error::other)?;
    Ok(Box::new(response))
}

fn read_source(name: &str) -> io::Result<String> {
    let mut content = String::new();
    if name == STDIN_NAME {
        io::stdin().read_to_string(&mut content)?;
    } else {
        std::fs::File::open(name)?.read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Content of a file (or stdin) given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct File {
    data: String,
}

impl File {
    /// Wrap already-read content
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// Content as text
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Content as bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// Whether nothing was read
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Take the content
    pub fn into_string(self) -> String {
        self.data
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

/// Parser registered as `file`: reads the named file into the field
#[derive(Debug, Clone, Copy, Default)]
pub struct FileParser;

impl FileParser {
    /// Factory registered as `file`
    pub fn factory(_kind: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(FileParser)
    }
}

impl FlagParser for FileParser {
    fn parse(&self, raw: &str) -> CliResult<Value> {
        let content = read_source(raw)
            .map_err(|e| CliError::invalid_value("file", raw, e.to_string()))?;
        Ok(Value::String(content))
    }
}

/// Lazily opened input named on the command line.
///
/// The source can be swapped with [`set_reader`](Reader::set_reader).
#[derive(Default)]
pub struct Reader {
    name: String,
    source: Option<Box<dyn Read>>,
}

impl Reader {
    /// Reader over the file or URL `name`, or stdin for `-`
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    /// Name given on the command line; empty after [`set_reader`](Self::set_reader)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether reads come from stdin
    pub fn is_stdin(&self) -> bool {
        self.name == STDIN_NAME
    }

    /// Whether reads come from an http(s) URL
    pub fn is_remote(&self) -> bool {
        is_url(&self.name)
    }

    /// Read from `reader` from now on
    pub fn set_reader(&mut self, reader: impl Read + 'static) {
        self.name.clear();
        self.source = Some(Box::new(reader));
    }

    /// Drop the open source; the next read reopens it by name
    pub fn close(&mut self) {
        self.source = None;
    }

    fn source(&mut self) -> io::Result<Option<&mut Box<dyn Read>>> {
        if self.source.is_none() && !self.name.is_empty() {
            let source: Box<dyn Read> = if self.is_stdin() {
                Box::new(io::stdin())
            } else if self.is_remote() {
                open_remote(&self.name)?
            } else {
                Box::new(std::fs::File::open(&self.name)?)
            };
            self.source = Some(source);
        }
        Ok(self.source.as_mut())
    }
}

impl Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.source()? {
            Some(source) => source.read(buf),
            None => Ok(0),
        }
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.name)
            .field("open", &self.source.is_some())
            .finish()
    }
}

impl Serialize for Reader {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for Reader {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Reader::open)
    }
}

/// Parser registered as `reader`: checks that the named file exists.
/// URLs are taken as given and fetched on first read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderParser;

impl ReaderParser {
    /// Factory registered as `reader`
    pub fn factory(_kind: &FieldKind) -> Box<dyn FlagParser> {
        Box::new(ReaderParser)
    }
}

impl FlagParser for ReaderParser {
    fn parse(&self, raw: &str) -> CliResult<Value> {
        if raw != STDIN_NAME && !is_url(raw) {
            std::fs::metadata(raw)
                .map_err(|e| CliError::invalid_value("reader", raw, e.to_string()))?;
        }
        Ok(Value::String(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::TcpListener;
    use tempfile::TempDir;

    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            write!(
                stream,
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{}/data.txt", addr)
    }

    #[test]
    fn test_file_parser() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("in.txt");
        std::fs::write(&path, "hello").unwrap();

        let value = FileParser.parse(path.to_str().unwrap()).unwrap();
        assert_eq!(value, Value::String("hello".into()));
        let file: File = serde_json::from_value(value).unwrap();
        assert_eq!(file.to_string(), "hello");

        let missing = temp_dir.path().join("missing.txt");
        assert!(FileParser.parse(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_reader_lazy_open() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("in.txt");
        std::fs::write(&path, "from file").unwrap();

        let mut reader = Reader::open(path.to_str().unwrap());
        assert!(!reader.is_stdin());
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data, "from file");

        reader.set_reader("string reader".as_bytes());
        assert_eq!(reader.name(), "");
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data, "string reader");
    }

    #[test]
    fn test_reader_parser() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("in.txt");
        std::fs::write(&path, "x").unwrap();

        assert_eq!(
            ReaderParser.parse(path.to_str().unwrap()).unwrap(),
            Value::String(path.to_str().unwrap().into())
        );
        assert_eq!(ReaderParser.parse("-").unwrap(), Value::String("-".into()));
        assert!(ReaderParser.parse("/argbind/no/such/file").is_err());

        let reader: Reader = serde_json::from_value(Value::String("-".into())).unwrap();
        assert!(reader.is_stdin());
    }

    #[test]
    fn test_default_reader_is_empty() {
        let mut reader = Reader::default();
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_reader_from_url() {
        let url = serve_once("200 OK", "remote body");
        assert_eq!(ReaderParser.parse(&url).unwrap(), Value::String(url.clone()));

        let mut reader: Reader = serde_json::from_value(Value::String(url)).unwrap();
        assert!(reader.is_remote());
        assert!(!reader.is_stdin());
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data, "remote body");
    }

    #[test]
    fn test_reader_url_error_status() {
        let url = serve_once("404 Not Found", "gone");
        let mut reader = Reader::open(url);
        let mut data = String::new();
        assert!(reader.read_to_string(&mut data).is_err());
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a.txt"));
        assert!(is_url("http://localhost:8080"));
        assert!(!is_url("./http://x"));
        assert!(!is_url("-"));
        assert!(is_loopback("http://127.0.0.1:9/x"));
        assert!(!is_loopback("https://example.com/"));
    }
}
